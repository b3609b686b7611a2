// src/models/assets.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{auth::User, permission::ModuleKey};

// ---
// Traits que ligam as entidades ao armazenamento e à API
// ---

/// Qualquer coisa que a API REST expõe como coleção (`/api/{RESOURCE}`).
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const RESOURCE: &'static str;

    fn id(&self) -> Uuid;
}

/// Registro plano guardado no armazenamento chave-valor e protegido por um módulo da grade.
pub trait Entity: Resource + Validate + Default {
    /// Nome da tabela (a chave final fica `it_management_{TABLE}`).
    const TABLE: &'static str;
    const MODULE: ModuleKey;

    fn set_id(&mut self, id: Uuid);

    /// Texto curto usado no histórico de uso.
    fn label(&self) -> String;

    // Chamado antes de gravar (create e update)
    fn touch(&mut self, _now: DateTime<Utc>) {}
}

impl Resource for User {
    const RESOURCE: &'static str = "staff";

    fn id(&self) -> Uuid {
        self.id
    }
}

macro_rules! impl_entity {
    ($ty:ty, $resource:literal, $table:literal, $module:expr, |$this:ident| $label:expr) => {
        impl Resource for $ty {
            const RESOURCE: &'static str = $resource;

            fn id(&self) -> Uuid {
                self.id
            }
        }

        impl Entity for $ty {
            const TABLE: &'static str = $table;
            const MODULE: ModuleKey = $module;

            fn set_id(&mut self, id: Uuid) {
                self.id = id;
            }

            fn label(&self) -> String {
                let $this = self;
                $label
            }
        }
    };
}

// --- 1. Equipamentos ---
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    #[default]
    Available,
    InUse,
    InRepair,
    Retired,
    Lost,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Equipment {
    pub id: Uuid,
    #[validate(length(min = 1, message = "O campo 'assetTag' é obrigatório."))]
    pub asset_tag: String,
    #[validate(length(min = 1, message = "O nome do dispositivo é obrigatório."))]
    pub device_name: String,
    #[validate(length(min = 1, message = "O tipo do dispositivo é obrigatório."))]
    pub device_type: String,
    pub serial_number: String,
    pub assigned_to: String,
    pub status: EquipmentStatus,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
    pub supplier: String,
    pub operating_system: String,
    pub ip_address: String,
    pub notes: String,
    pub unit: String,
}

impl_entity!(Equipment, "equipment", "equipment", ModuleKey::Equipment, |e| format!(
    "{} ({})",
    e.device_name, e.asset_tag
));

// --- 2. Tipos de equipamento ---
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EquipmentType {
    pub id: Uuid,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(length(min = 1, message = "O prefixo é obrigatório."))]
    pub prefix: String,
    pub category: String,
    pub notes: String,
}

impl_entity!(EquipmentType, "equipment-types", "equipment_types", ModuleKey::EquipmentTypes, |t| t
    .name
    .clone());

// --- 3. Fabricantes ---
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Manufacturer {
    pub id: Uuid,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub website: String,
}

impl_entity!(Manufacturer, "manufacturers", "manufacturers", ModuleKey::Manufacturers, |m| m
    .name
    .clone());

// --- 4. Unidades organizacionais ---
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Unit {
    pub id: Uuid,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub manager: String,
    pub description: String,
}

impl_entity!(Unit, "units", "units", ModuleKey::Units, |u| u.name.clone());

// --- 5. Licenças ---
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    #[default]
    Active,
    Expired,
}

fn validate_seats(license: &License) -> Result<(), ValidationError> {
    if license.assigned_seats > license.total_seats {
        let mut err = ValidationError::new("seats");
        err.message = Some("Licenças atribuídas não podem exceder o total.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = "validate_seats"))]
pub struct License {
    pub id: Uuid,
    #[validate(length(min = 1, message = "O nome do software é obrigatório."))]
    pub software_name: String,
    pub product_key: String,
    pub purchase_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub total_seats: u32,
    pub assigned_seats: u32,
    pub status: LicenseStatus,
}

impl_entity!(License, "licenses", "licenses", ModuleKey::Licenses, |l| l.software_name.clone());

// --- 6. Alocações ---
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    #[default]
    Allocated,
    Returned,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Allocation {
    pub id: Uuid,
    #[validate(length(min = 1, message = "O equipamento é obrigatório."))]
    pub asset_name: String,
    #[validate(length(min = 1, message = "O funcionário é obrigatório."))]
    pub staff_name: String,
    pub allocation_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub status: AllocationStatus,
}

impl_entity!(Allocation, "allocations", "allocations", ModuleKey::Allocation, |a| format!(
    "{} -> {}",
    a.asset_name, a.staff_name
));

// --- 7. Manutenção ---
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Maintenance {
    pub id: Uuid,
    #[validate(length(min = 1, message = "O equipamento é obrigatório."))]
    pub asset_name: String,
    #[validate(length(min = 1, message = "O tipo de manutenção é obrigatório."))]
    pub maintenance_type: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: MaintenanceStatus,
    pub notes: String,
    pub unit: String,
}

impl_entity!(Maintenance, "maintenance", "maintenance", ModuleKey::Maintenance, |m| format!(
    "{} ({})",
    m.asset_name, m.maintenance_type
));

// --- 8. Transferências ---
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Transfer {
    pub id: Uuid,
    #[validate(length(min = 1, message = "O equipamento é obrigatório."))]
    pub asset_name: String,
    #[validate(length(min = 1, message = "O funcionário de origem é obrigatório."))]
    pub from_staff: String,
    #[validate(length(min = 1, message = "O funcionário de destino é obrigatório."))]
    pub to_staff: String,
    pub transfer_date: Option<NaiveDate>,
    pub notes: String,
}

impl_entity!(Transfer, "transfers", "transfers", ModuleKey::Transfers, |t| format!(
    "{}: {} -> {}",
    t.asset_name, t.from_staff, t.to_staff
));

// --- 9. Chamados de suporte (módulo "repairs") ---
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Ticket {
    pub id: Uuid,
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,
    pub description: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub created_by: String,
    pub assigned_to: String,
    pub category: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Ticket {
    const RESOURCE: &'static str = "tickets";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for Ticket {
    const TABLE: &'static str = "tickets";
    const MODULE: ModuleKey = ModuleKey::Repairs;

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn label(&self) -> String {
        self.title.clone()
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.created_at.get_or_insert(now);
        self.updated_at = Some(now);
    }
}

// --- 10. Histórico de uso (somente inclusão) ---
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageHistory {
    pub id: Uuid,
    pub timestamp: Option<DateTime<Utc>>,
    pub user: String,
    #[validate(length(min = 1))]
    pub action: String,
    pub asset: String,
    pub details: String,
}

impl_entity!(UsageHistory, "usage-history", "usage_history", ModuleKey::UsageHistory, |h| h
    .action
    .clone());
