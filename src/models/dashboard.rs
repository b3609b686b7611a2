// src/models/dashboard.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::models::assets::EquipmentStatus;

// Resumo do painel (os cards do topo + os agrupamentos dos gráficos)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_equipment: usize,
    pub available_equipment: usize,
    pub in_use_equipment: usize,
    pub in_repair_equipment: usize,
    pub total_staff: usize,         // Só funcionários ativos
    pub total_licenses: usize,
    pub active_licenses: usize,
    pub pending_maintenance: usize, // Manutenções agendadas
    pub open_tickets: usize,        // Chamados abertos ou em andamento
    pub equipment_by_type: BTreeMap<String, usize>,
    pub equipment_by_status: BTreeMap<EquipmentStatus, usize>,
}
