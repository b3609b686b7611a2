// src/services/permission.rs
//
// Avaliador de permissões: funções puras sobre (papel, grade).
// Admin passa em tudo; para os demais, módulo ausente da grade = negado.

use crate::{
    common::error::AppError,
    models::{
        auth::User,
        permission::{Action, ModuleKey, Role},
    },
};

fn is_admin(user: &User) -> bool {
    user.role == Role::Admin
}

/// Consulta única para as quatro ações.
pub fn can(user: Option<&User>, module: ModuleKey, action: Action) -> bool {
    match user {
        None => false,
        Some(u) if is_admin(u) => true,
        Some(u) => u.permissions.allows(module, action),
    }
}

/// Itens sem módulo (links puros, cabeçalhos de grupo) são sempre visíveis.
pub fn can_view(user: Option<&User>, module: Option<ModuleKey>) -> bool {
    match module {
        None => true,
        Some(module) => can(user, module, Action::View),
    }
}

pub fn can_role(user: Option<&User>, allowed: &[Role]) -> bool {
    user.is_some_and(|u| allowed.contains(&u.role))
}

/// Visibilidade dos botões de inclusão, edição e exclusão.
pub fn can_mutate(user: Option<&User>, module: ModuleKey, action: Action) -> bool {
    can(user, module, action)
}

/// Guarda do lado do servidor.
pub fn ensure(user: &User, module: ModuleKey, action: Action) -> Result<(), AppError> {
    if can(Some(user), module, action) {
        Ok(())
    } else {
        tracing::warn!("🚫 {} sem permissão {}:{}", user.employee_id, module, action);
        Err(AppError::Forbidden { module, action })
    }
}
