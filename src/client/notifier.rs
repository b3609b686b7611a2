// src/client/notifier.rs

use serde::{Deserialize, Serialize};
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    time::{Duration, Instant},
};
use tokio::sync::broadcast;

pub const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

pub trait Notifier: Send + Sync {
    fn show(&self, title: &str, kind: ToastKind);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub title: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

// ---
// Central de notificações
// ---
// Guarda as notificações ainda visíveis e repassa cada uma aos assinantes.
// Uma notificação some sozinha depois do TTL; `dismiss` tira antes.
pub struct ToastCenter {
    toasts: Mutex<Vec<Toast>>,
    next_id: AtomicU64,
    ttl: Duration,
    sender: broadcast::Sender<Toast>,
}

impl Default for ToastCenter {
    fn default() -> Self {
        Self::with_ttl(TOAST_TTL)
    }
}

impl ToastCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { toasts: Mutex::new(Vec::new()), next_id: AtomicU64::new(1), ttl, sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.sender.subscribe()
    }

    fn prune(&self, toasts: &mut Vec<Toast>) {
        let now = Instant::now();
        toasts.retain(|t| now.duration_since(t.shown_at) < self.ttl);
    }

    /// Notificações ainda visíveis, da mais antiga para a mais nova.
    pub fn active(&self) -> Vec<Toast> {
        let mut toasts = self.toasts.lock().unwrap_or_else(|e| e.into_inner());
        self.prune(&mut toasts);
        toasts.clone()
    }

    pub fn count(&self, kind: ToastKind) -> usize {
        self.active().iter().filter(|t| t.kind == kind).count()
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.lock().unwrap_or_else(|e| e.into_inner()).retain(|t| t.id != id);
    }
}

impl Notifier for ToastCenter {
    fn show(&self, title: &str, kind: ToastKind) {
        let toast = Toast {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            title: title.to_string(),
            kind,
            shown_at: Instant::now(),
        };

        match kind {
            ToastKind::Error => tracing::warn!("🔔 {}", toast.title),
            _ => tracing::debug!("🔔 {}", toast.title),
        }

        {
            let mut toasts = self.toasts.lock().unwrap_or_else(|e| e.into_inner());
            self.prune(&mut toasts);
            toasts.push(toast.clone());
        }
        // Sem assinantes o envio falha, e tudo bem
        let _ = self.sender.send(toast);
    }
}
