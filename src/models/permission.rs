// src/models/permission.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;

// ---
// Papéis (Roles)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(alias = "ADMIN")]
    Admin,
    #[serde(alias = "UNIT_MANAGER")]
    UnitManager,
    #[serde(alias = "EMPLOYEE")]
    Employee,
}

// ---
// Chaves de módulo
// ---
/// Cada área navegável do painel. Conjunto fechado: uma chave desconhecida
/// num payload é erro de desserialização.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleKey {
    Dashboard,
    Equipment,
    EquipmentTypes,
    Staff,
    Manufacturers,
    Units,
    Licenses,
    Network,
    Allocation,
    Maintenance,
    Repairs,
    Transfers,
    UsageHistory,
    Reports,
    Permissions,
    Roles,
    DatabaseExplorer,
    Settings,
}

impl ModuleKey {
    pub const ALL: [ModuleKey; 18] = [
        ModuleKey::Dashboard,
        ModuleKey::Equipment,
        ModuleKey::EquipmentTypes,
        ModuleKey::Staff,
        ModuleKey::Manufacturers,
        ModuleKey::Units,
        ModuleKey::Licenses,
        ModuleKey::Network,
        ModuleKey::Allocation,
        ModuleKey::Maintenance,
        ModuleKey::Repairs,
        ModuleKey::Transfers,
        ModuleKey::UsageHistory,
        ModuleKey::Reports,
        ModuleKey::Permissions,
        ModuleKey::Roles,
        ModuleKey::DatabaseExplorer,
        ModuleKey::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKey::Dashboard => "dashboard",
            ModuleKey::Equipment => "equipment",
            ModuleKey::EquipmentTypes => "equipment-types",
            ModuleKey::Staff => "staff",
            ModuleKey::Manufacturers => "manufacturers",
            ModuleKey::Units => "units",
            ModuleKey::Licenses => "licenses",
            ModuleKey::Network => "network",
            ModuleKey::Allocation => "allocation",
            ModuleKey::Maintenance => "maintenance",
            ModuleKey::Repairs => "repairs",
            ModuleKey::Transfers => "transfers",
            ModuleKey::UsageHistory => "usage-history",
            ModuleKey::Reports => "reports",
            ModuleKey::Permissions => "permissions",
            ModuleKey::Roles => "roles",
            ModuleKey::DatabaseExplorer => "database-explorer",
            ModuleKey::Settings => "settings",
        }
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---
// Ações
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Add,
    Edit,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Add, Action::Edit, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Add => "add",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---
// Os quatro booleanos de um módulo
// ---
/// Registros parciais (`{"view": true}`) chegam com o resto em `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ModulePermissions {
    pub view: bool,
    pub add: bool,
    pub edit: bool,
    pub delete: bool,
}

impl ModulePermissions {
    pub const FULL: ModulePermissions = ModulePermissions { view: true, add: true, edit: true, delete: true };
    pub const VIEW_ONLY: ModulePermissions = ModulePermissions { view: true, add: false, edit: false, delete: false };

    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::View => self.view,
            Action::Add => self.add,
            Action::Edit => self.edit,
            Action::Delete => self.delete,
        }
    }
}

// ---
// A grade de permissões
// ---
/// Módulo ausente da grade = tudo negado.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PermissionGrid(BTreeMap<ModuleKey, ModulePermissions>);

impl PermissionGrid {
    /// Grade vazia: nenhum módulo, nenhuma ação.
    pub fn deny_all() -> Self {
        Self(BTreeMap::new())
    }

    pub fn full() -> Self {
        Self(ModuleKey::ALL.iter().map(|m| (*m, ModulePermissions::FULL)).collect())
    }

    /// Grade inicial de cada papel, usada quando um funcionário é criado sem grade explícita.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => Self::full(),
            Role::UnitManager => {
                let view_add_edit = ModulePermissions { view: true, add: true, edit: true, delete: false };
                let view_add = ModulePermissions { view: true, add: true, edit: false, delete: false };
                Self::deny_all()
                    .with(ModuleKey::Dashboard, ModulePermissions::VIEW_ONLY)
                    .with(ModuleKey::Equipment, view_add_edit)
                    .with(ModuleKey::Allocation, view_add_edit)
                    .with(ModuleKey::Maintenance, view_add_edit)
                    .with(ModuleKey::Transfers, view_add)
                    .with(ModuleKey::Staff, ModulePermissions::VIEW_ONLY)
                    .with(ModuleKey::Units, ModulePermissions::VIEW_ONLY)
                    .with(ModuleKey::Licenses, ModulePermissions::VIEW_ONLY)
                    .with(ModuleKey::Reports, ModulePermissions::VIEW_ONLY)
                    .with(ModuleKey::UsageHistory, ModulePermissions::VIEW_ONLY)
            }
            Role::Employee => Self::deny_all()
                .with(ModuleKey::Dashboard, ModulePermissions::VIEW_ONLY)
                .with(ModuleKey::Equipment, ModulePermissions::VIEW_ONLY)
                .with(ModuleKey::Staff, ModulePermissions::VIEW_ONLY)
                .with(ModuleKey::Maintenance, ModulePermissions::VIEW_ONLY)
                .with(ModuleKey::Reports, ModulePermissions::VIEW_ONLY),
        }
    }

    pub fn with(mut self, module: ModuleKey, permissions: ModulePermissions) -> Self {
        self.0.insert(module, permissions);
        self
    }

    pub fn get(&self, module: ModuleKey) -> Option<&ModulePermissions> {
        self.0.get(&module)
    }

    pub fn allows(&self, module: ModuleKey, action: Action) -> bool {
        self.0.get(&module).is_some_and(|p| p.allows(action))
    }

    pub fn modules(&self) -> impl Iterator<Item = (&ModuleKey, &ModulePermissions)> {
        self.0.iter()
    }
}
