use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::errors::internal::AuditError;
use crate::types::db::audit_event;
use crate::types::internal::audit::{AuditEvent, EventType};

/// Append-only storage for audit events
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persist one event; `data` is stored as a JSON object string
    pub async fn write_event(&self, event: AuditEvent) -> Result<(), InternalError> {
        let data = serde_json::to_string(&event.data)
            .map_err(|e| AuditError::LogWriteFailed(format!("audit data not serializable: {}", e)))?;

        // Failed sign-ins for unknown emails have no subject
        let subject = event.user_id.unwrap_or_else(|| "unknown".to_string());

        audit_event::ActiveModel {
            id: NotSet,
            timestamp: Set(Utc::now().to_rfc3339()),
            event_type: Set(event.event_type.to_string()),
            user_id: Set(subject),
            ip_address: Set(event.ip_address),
            jwt_id: Set(event.jwt_id),
            request_id: Set(event.request_id),
            data: Set(data),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("write_audit_event", e))?;

        Ok(())
    }

    /// Events of one type in the order they were written
    pub async fn events_of_type(
        &self,
        event_type: EventType,
    ) -> Result<Vec<audit_event::Model>, InternalError> {
        audit_event::Entity::find()
            .filter(audit_event::Column::EventType.eq(event_type.to_string()))
            .order_by_asc(audit_event::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_audit_events", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    #[tokio::test]
    async fn test_events_of_type_filters_and_orders() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let store = AuditStore::new(db);

        let mut first = AuditEvent::new(EventType::AccessDenied);
        first.user_id = Some("user-1".to_string());
        store.write_event(first).await.unwrap();
        store.write_event(AuditEvent::new(EventType::SignOut)).await.unwrap();
        store.write_event(AuditEvent::new(EventType::AccessDenied)).await.unwrap();

        let denials = store.events_of_type(EventType::AccessDenied).await.unwrap();
        assert_eq!(denials.len(), 2);
        assert_eq!(denials[0].user_id, "user-1");
        assert_eq!(denials[1].user_id, "unknown");
        assert!(denials[0].id < denials[1].id);
    }
}
