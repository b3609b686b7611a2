// src/services/dashboard_service.rs

use crate::{
    common::error::AppError,
    db::{CollectionRepository, UserRepository},
    models::{
        assets::{Equipment, EquipmentStatus, License, LicenseStatus, Maintenance, MaintenanceStatus, Ticket, TicketStatus},
        auth::StaffStatus,
        dashboard::DashboardSummary,
    },
};

#[derive(Clone)]
pub struct DashboardService {
    collections: CollectionRepository,
    user_repo: UserRepository,
}

impl DashboardService {
    pub fn new(collections: CollectionRepository, user_repo: UserRepository) -> Self {
        Self { collections, user_repo }
    }

    pub async fn get_summary(&self) -> Result<DashboardSummary, AppError> {
        let equipment = self.collections.list::<Equipment>().await?;
        let licenses = self.collections.list::<License>().await?;
        let maintenance = self.collections.list::<Maintenance>().await?;
        let tickets = self.collections.list::<Ticket>().await?;
        let staff = self.user_repo.list().await?;

        let mut summary = DashboardSummary {
            total_equipment: equipment.len(),
            total_staff: staff.iter().filter(|s| s.status == StaffStatus::Active).count(),
            total_licenses: licenses.len(),
            active_licenses: licenses.iter().filter(|l| l.status == LicenseStatus::Active).count(),
            pending_maintenance: maintenance
                .iter()
                .filter(|m| m.status == MaintenanceStatus::Scheduled)
                .count(),
            open_tickets: tickets
                .iter()
                .filter(|t| matches!(t.status, TicketStatus::Open | TicketStatus::InProgress))
                .count(),
            ..Default::default()
        };

        for item in &equipment {
            match item.status {
                EquipmentStatus::Available => summary.available_equipment += 1,
                EquipmentStatus::InUse => summary.in_use_equipment += 1,
                EquipmentStatus::InRepair => summary.in_repair_equipment += 1,
                EquipmentStatus::Retired | EquipmentStatus::Lost => {}
            }
            *summary.equipment_by_status.entry(item.status).or_default() += 1;
            *summary.equipment_by_type.entry(item.device_type.clone()).or_default() += 1;
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        kv_store::MemoryStore,
        seed::{seed_demo_data, SeedPasswords},
    };
    use std::sync::Arc;

    #[tokio::test]
    async fn summary_counts_the_demo_data() {
        let collections = CollectionRepository::new(Arc::new(MemoryStore::new()));
        seed_demo_data(&collections, &SeedPasswords { admin_hash: "a".into(), staff_hash: "s".into() })
            .await
            .unwrap();
        let service = DashboardService::new(collections.clone(), UserRepository::new(collections));

        let summary = service.get_summary().await.unwrap();

        assert_eq!(summary.total_equipment, 3);
        assert_eq!(summary.in_use_equipment, 2);
        assert_eq!(summary.available_equipment, 1);
        assert_eq!(summary.total_staff, 3);
        assert_eq!(summary.total_licenses, 2);
        assert_eq!(summary.active_licenses, 1);
        assert_eq!(summary.pending_maintenance, 1);
        assert_eq!(summary.open_tickets, 1);
        assert_eq!(summary.equipment_by_type.get("Laptop"), Some(&1));
        assert_eq!(summary.equipment_by_status.get(&EquipmentStatus::InUse), Some(&2));
    }

    #[tokio::test]
    async fn empty_store_gives_zeroes() {
        let collections = CollectionRepository::new(Arc::new(MemoryStore::new()));
        let service = DashboardService::new(collections.clone(), UserRepository::new(collections));

        assert_eq!(service.get_summary().await.unwrap(), DashboardSummary::default());
    }
}
