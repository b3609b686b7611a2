// src/db/seed.rs

use chrono::{NaiveDate, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{user_repo::STAFF_TABLE, CollectionRepository},
    models::{
        assets::{
            Allocation, AllocationStatus, Entity, Equipment, EquipmentStatus, EquipmentType, License,
            LicenseStatus, Maintenance, MaintenanceStatus, Manufacturer, Ticket, TicketPriority,
            TicketStatus, Transfer, Unit,
        },
        auth::{Gender, StaffRecord, StaffStatus},
        permission::{ModuleKey, ModulePermissions, PermissionGrid, Role},
    },
};

/// Senhas já com hash, calculadas por quem chama (o AuthService).
pub struct SeedPasswords {
    pub admin_hash: String,
    pub staff_hash: String,
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

// Só grava numa tabela vazia: rodar de novo não duplica nada.
async fn seed_table<T>(collections: &CollectionRepository, table: &str, rows: Vec<T>) -> Result<bool, AppError>
where
    T: Serialize + DeserializeOwned + Send,
{
    if !collections.is_empty(table).await? {
        return Ok(false);
    }
    collections
        .modify::<T, _, _>(table, |existing| {
            existing.extend(rows);
            Ok(())
        })
        .await?;
    Ok(true)
}

async fn seed_entities<E: Entity>(collections: &CollectionRepository, rows: Vec<E>) -> Result<bool, AppError> {
    let rows = rows
        .into_iter()
        .map(|mut e| {
            e.set_id(Uuid::new_v4());
            e.touch(Utc::now());
            e
        })
        .collect();
    seed_table(collections, E::TABLE, rows).await
}

#[allow(clippy::too_many_arguments)]
fn staff(
    employee_id: &str,
    full_name: &str,
    email: &str,
    unit: &str,
    position: &str,
    role: Role,
    gender: Gender,
    permissions: PermissionGrid,
    must_change_password: bool,
    password_hash: &str,
) -> StaffRecord {
    StaffRecord {
        id: Uuid::new_v4(),
        employee_id: employee_id.into(),
        full_name: full_name.into(),
        email: email.into(),
        phone: String::new(),
        unit: unit.into(),
        position: position.into(),
        join_date: date(2022, 3, 15),
        status: StaffStatus::Active,
        role,
        gender,
        permissions,
        must_change_password,
        password_hash: password_hash.into(),
    }
}

pub async fn seed_demo_data(collections: &CollectionRepository, passwords: &SeedPasswords) -> Result<(), AppError> {
    let it_unit = "Information Technology";
    let admin_unit = "Administration";

    let people = vec![
        staff("admin", "System Administrator", "admin@company.com", it_unit, "Administrator",
              Role::Admin, Gender::Male, PermissionGrid::full(), false, &passwords.admin_hash),
        staff("NV001", "Nguyen Van An", "an.nguyen@company.com", it_unit, "Developer",
              Role::Employee, Gender::Male,
              PermissionGrid::deny_all()
                  .with(ModuleKey::Dashboard, ModulePermissions::VIEW_ONLY)
                  .with(ModuleKey::Equipment, ModulePermissions::VIEW_ONLY)
                  .with(ModuleKey::Staff, ModulePermissions::VIEW_ONLY)
                  .with(ModuleKey::Reports, ModulePermissions::VIEW_ONLY),
              true, &passwords.staff_hash),
        staff("NV002", "Tran Thi Binh", "binh.tran@company.com", admin_unit, "Specialist",
              Role::Employee, Gender::Female,
              PermissionGrid::deny_all()
                  .with(ModuleKey::Dashboard, ModulePermissions::VIEW_ONLY)
                  .with(ModuleKey::Equipment, ModulePermissions::VIEW_ONLY)
                  .with(ModuleKey::Staff, ModulePermissions::VIEW_ONLY),
              true, &passwords.staff_hash),
    ];
    if seed_table(collections, STAFF_TABLE, people).await? {
        tracing::info!("🌱 Funcionários de demonstração criados");
    }

    seed_entities(collections, vec![
        Equipment {
            asset_tag: "LT001".into(), device_name: "Dell Latitude 5420".into(), device_type: "Laptop".into(),
            serial_number: "DL5420001".into(), assigned_to: "Nguyen Van An".into(), status: EquipmentStatus::InUse,
            purchase_date: date(2023, 1, 15), warranty_end_date: date(2026, 1, 15), supplier: "Dell Technologies".into(),
            operating_system: "Windows 11 Pro".into(), ip_address: "192.168.1.101".into(), unit: it_unit.into(),
            ..Default::default()
        },
        Equipment {
            asset_tag: "PC001".into(), device_name: "HP ProDesk 400 G7".into(), device_type: "Desktop".into(),
            serial_number: "HP400G7001".into(), status: EquipmentStatus::Available,
            purchase_date: date(2023, 3, 20), warranty_end_date: date(2026, 3, 20), supplier: "HP Inc.".into(),
            operating_system: "Windows 11 Pro".into(), ip_address: "192.168.1.102".into(), unit: admin_unit.into(),
            ..Default::default()
        },
        Equipment {
            asset_tag: "SW001".into(), device_name: "Cisco Catalyst 2960".into(), device_type: "Switch".into(),
            serial_number: "CSC2960001".into(), status: EquipmentStatus::InUse,
            purchase_date: date(2022, 11, 10), warranty_end_date: date(2025, 11, 10), supplier: "Cisco Systems".into(),
            operating_system: "IOS".into(), ip_address: "192.168.1.1".into(), unit: it_unit.into(),
            ..Default::default()
        },
    ]).await?;

    seed_entities(collections, vec![
        EquipmentType { name: "Laptop".into(), prefix: "LT".into(), category: "Computer".into(), ..Default::default() },
        EquipmentType { name: "Desktop".into(), prefix: "PC".into(), category: "Computer".into(), ..Default::default() },
        EquipmentType { name: "Switch".into(), prefix: "SW".into(), category: "Network".into(), ..Default::default() },
        EquipmentType { name: "Router".into(), prefix: "RT".into(), category: "Network".into(), ..Default::default() },
        EquipmentType { name: "Printer".into(), prefix: "PR".into(), category: "Peripheral".into(), ..Default::default() },
    ]).await?;

    seed_entities(collections, vec![
        Manufacturer { name: "Dell Technologies".into(), contact_person: "John Smith".into(), website: "www.dell.com".into(), ..Default::default() },
        Manufacturer { name: "HP Inc.".into(), contact_person: "Jane Doe".into(), website: "www.hp.com".into(), ..Default::default() },
        Manufacturer { name: "Cisco Systems".into(), contact_person: "Mike Johnson".into(), website: "www.cisco.com".into(), ..Default::default() },
        Manufacturer { name: "Lenovo".into(), contact_person: "Li Wei".into(), website: "www.lenovo.com".into(), ..Default::default() },
    ]).await?;

    seed_entities(collections, vec![
        Unit { name: it_unit.into(), manager: "Nguyen Van Quan".into(), description: "IT systems and software".into(), ..Default::default() },
        Unit { name: admin_unit.into(), manager: "Tran Thi Lan".into(), description: "Administration and HR".into(), ..Default::default() },
        Unit { name: "Accounting".into(), manager: "Le Van Toan".into(), description: "Finance and accounting".into(), ..Default::default() },
    ]).await?;

    seed_entities(collections, vec![
        License {
            software_name: "Microsoft Office 365".into(), product_key: "XXXXX-XXXXX-XXXXX-XXXXX-XXXXX".into(),
            purchase_date: date(2023, 1, 1), expiry_date: date(2024, 1, 1), total_seats: 50, assigned_seats: 35,
            status: LicenseStatus::Active, ..Default::default()
        },
        License {
            software_name: "Adobe Creative Suite".into(), product_key: "YYYYY-YYYYY-YYYYY-YYYYY-YYYYY".into(),
            purchase_date: date(2022, 6, 15), expiry_date: date(2023, 6, 15), total_seats: 10, assigned_seats: 8,
            status: LicenseStatus::Expired, ..Default::default()
        },
    ]).await?;

    seed_entities(collections, vec![
        Allocation {
            asset_name: "Dell Latitude 5420".into(), staff_name: "Nguyen Van An".into(),
            allocation_date: date(2023, 2, 1), status: AllocationStatus::Allocated, ..Default::default()
        },
        Allocation {
            asset_name: "HP ProDesk 400 G7".into(), staff_name: "Tran Thi Binh".into(),
            allocation_date: date(2023, 3, 25), return_date: date(2023, 8, 15), status: AllocationStatus::Returned,
            ..Default::default()
        },
    ]).await?;

    seed_entities(collections, vec![
        Maintenance {
            asset_name: "Dell Latitude 5420".into(), maintenance_type: "Periodic maintenance".into(),
            start_date: date(2023, 6, 1), end_date: date(2023, 6, 2), status: MaintenanceStatus::Completed,
            notes: "Cleaning and software update".into(), unit: it_unit.into(), ..Default::default()
        },
        Maintenance {
            asset_name: "Cisco Catalyst 2960".into(), maintenance_type: "Upgrade".into(),
            start_date: date(2023, 8, 15), end_date: date(2023, 8, 16), status: MaintenanceStatus::Scheduled,
            notes: "Firmware upgrade".into(), unit: it_unit.into(), ..Default::default()
        },
    ]).await?;

    seed_entities(collections, vec![Transfer {
        asset_name: "HP ProDesk 400 G7".into(), from_staff: "Tran Thi Binh".into(), to_staff: "Nguyen Van Cuong".into(),
        transfer_date: date(2023, 8, 15), notes: "Workstation change".into(), ..Default::default()
    }]).await?;

    seed_entities(collections, vec![Ticket {
        title: "Printer jam".into(), description: "Printer in room A keeps jamming".into(),
        priority: TicketPriority::High, status: TicketStatus::Open, created_by: "NV001".into(),
        assigned_to: "admin".into(), category: "Hardware".into(), ..Default::default()
    }]).await?;

    Ok(())
}
