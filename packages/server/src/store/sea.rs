use std::future::Future;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{ContactStatus, ServiceInterest};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::Index;
use sea_orm::*;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    ContactFilter, ContactPage, ContactSort, ContactStore, ContactSummary, PageRequest, SortKey,
    StoreError, TriageUpdate,
};
use crate::database::DbHandle;
use crate::entity::contact;
use crate::models::contact::{Contact, ContactDraft};

/// Orders priorities low < medium < high instead of by label.
const PRIORITY_RANK: &str =
    "CASE priority WHEN 'high' THEN 2 WHEN 'medium' THEN 1 ELSE 0 END";

/// [`ContactStore`] backed by the shared sea-orm pool.
#[derive(Clone)]
pub struct SeaOrmContactStore {
    db: DbHandle,
}

impl SeaOrmContactStore {
    pub fn new(db: DbHandle) -> Self {
        Self { db }
    }

    fn conn(&self) -> Result<&DatabaseConnection, StoreError> {
        self.db.conn().ok_or(StoreError::Unavailable)
    }

    /// Runs one storage call under the configured timeout and records the outcome
    /// on the availability flag.
    async fn guarded<T>(
        &self,
        call: impl Future<Output = Result<T, DbErr>>,
    ) -> Result<T, StoreError> {
        let result = match tokio::time::timeout(self.db.timeout(), call).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => {
                warn!(timeout = ?self.db.timeout(), "Storage call timed out");
                Err(StoreError::Unavailable)
            }
        };
        match &result {
            Err(StoreError::Unavailable) => self.db.mark(false),
            _ => self.db.mark(true),
        }
        result
    }
}

fn filtered(filter: &ContactFilter) -> Select<contact::Entity> {
    let mut select = contact::Entity::find();
    if let Some(status) = filter.status {
        select = select.filter(contact::Column::Status.eq(status));
    }
    if let Some(priority) = filter.priority {
        select = select.filter(contact::Column::Priority.eq(priority));
    }
    if let Some(interest) = filter.service_interest {
        select = select.filter(contact::Column::ServiceInterest.eq(interest));
    }
    if let Some(source) = &filter.source {
        select = select.filter(contact::Column::Source.eq(source.as_str()));
    }
    select
}

fn sorted(select: Select<contact::Entity>, sort: ContactSort) -> Select<contact::Entity> {
    let order = if sort.descending {
        Order::Desc
    } else {
        Order::Asc
    };
    let select = match sort.key {
        SortKey::CreatedAt => select.order_by(contact::Column::CreatedAt, order),
        SortKey::UpdatedAt => select.order_by(contact::Column::UpdatedAt, order),
        SortKey::Priority => select
            .order_by(Expr::cust(PRIORITY_RANK), order)
            .order_by(contact::Column::CreatedAt, Order::Desc),
        SortKey::Status => select
            .order_by(contact::Column::Status, order)
            .order_by(contact::Column::CreatedAt, Order::Desc),
        SortKey::Name => select.order_by(contact::Column::Name, order),
    };
    // v7 ids are time ordered
    let tie = if sort.descending && sort.key != SortKey::Name {
        Order::Desc
    } else {
        Order::Asc
    };
    select.order_by(contact::Column::Id, tie)
}

#[async_trait]
impl ContactStore for SeaOrmContactStore {
    fn is_available(&self) -> bool {
        self.db.is_available()
    }

    async fn create(&self, draft: ContactDraft) -> Result<Contact, StoreError> {
        let db = self.conn()?;
        let now = Utc::now();
        let record = contact::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(draft.name),
            email: Set(draft.email),
            message: Set(draft.message),
            phone: Set(draft.phone),
            company: Set(draft.company),
            service_interest: Set(draft.service_interest),
            source: Set(draft.source),
            status: Set(draft.status),
            priority: Set(draft.priority),
            notes: Set(None),
            ip_address: Set(draft.ip_address),
            user_agent: Set(draft.user_agent),
            session_id: Set(draft.session_id),
            metadata: Set(draft.metadata),
            email_sent: Set(false),
            email_sent_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = self.guarded(record.insert(db)).await?;
        Ok(Contact::from(model))
    }

    async fn get(&self, id: Uuid) -> Result<Contact, StoreError> {
        let db = self.conn()?;
        self.guarded(contact::Entity::find_by_id(id).one(db))
            .await?
            .map(Contact::from)
            .ok_or(StoreError::NotFound)
    }

    async fn list(
        &self,
        filter: ContactFilter,
        sort: ContactSort,
        page: PageRequest,
    ) -> Result<ContactPage, StoreError> {
        let db = self.conn()?;
        let select = filtered(&filter);

        let total = self.guarded(select.clone().count(db)).await?;
        let models = self
            .guarded(
                sorted(select, sort)
                    .offset(page.skip)
                    .limit(page.limit)
                    .all(db),
            )
            .await?;

        Ok(ContactPage {
            contacts: models.into_iter().map(Contact::from).collect(),
            total,
        })
    }

    async fn mark_email_sent(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        let db = self.conn()?;
        let result = self
            .guarded(
                contact::Entity::update_many()
                    .col_expr(contact::Column::EmailSent, Expr::value(true))
                    .col_expr(contact::Column::EmailSentAt, Expr::value(Some(at)))
                    .col_expr(contact::Column::UpdatedAt, Expr::value(at))
                    .filter(contact::Column::Id.eq(id))
                    .exec(db),
            )
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn update_triage(&self, id: Uuid, update: TriageUpdate) -> Result<Contact, StoreError> {
        let db = self.conn()?;
        let existing = self
            .guarded(contact::Entity::find_by_id(id).one(db))
            .await?
            .ok_or(StoreError::NotFound)?;

        let mut active = existing.into_active_model();
        active.status = Set(update.status);
        if let Some(priority) = update.priority {
            active.priority = Set(priority);
        }
        if let Some(notes) = update.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now());

        let model = self.guarded(active.update(db)).await?;
        Ok(Contact::from(model))
    }

    async fn summary(&self) -> Result<ContactSummary, StoreError> {
        let db = self.conn()?;

        let by_status: Vec<(ContactStatus, i64)> = self
            .guarded(
                contact::Entity::find()
                    .select_only()
                    .column(contact::Column::Status)
                    .column_as(Expr::cust("COUNT(*)"), "count")
                    .group_by(contact::Column::Status)
                    .into_tuple()
                    .all(db),
            )
            .await?;

        let mut by_interest: Vec<(ServiceInterest, i64)> = self
            .guarded(
                contact::Entity::find()
                    .select_only()
                    .column(contact::Column::ServiceInterest)
                    .column_as(Expr::cust("COUNT(*)"), "count")
                    .group_by(contact::Column::ServiceInterest)
                    .into_tuple()
                    .all(db),
            )
            .await?;
        by_interest.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));

        let by_status: std::collections::HashMap<_, _> = by_status
            .into_iter()
            .map(|(status, count)| (status, u64::try_from(count).unwrap_or(0)))
            .collect();

        Ok(ContactSummary {
            total: by_status.values().sum(),
            by_status,
            by_interest: by_interest
                .into_iter()
                .map(|(interest, count)| (interest, u64::try_from(count).unwrap_or(0)))
                .collect(),
        })
    }

    async fn conversation(
        &self,
        session_id: &str,
        sources: &[&str],
        limit: u64,
    ) -> Result<Vec<Contact>, StoreError> {
        let db = self.conn()?;
        let models = self
            .guarded(
                contact::Entity::find()
                    .filter(contact::Column::SessionId.eq(session_id))
                    .filter(contact::Column::Source.is_in(sources.iter().copied()))
                    .order_by_asc(contact::Column::CreatedAt)
                    .order_by_asc(contact::Column::Id)
                    .limit(limit)
                    .all(db),
            )
            .await?;
        Ok(models.into_iter().map(Contact::from).collect())
    }

    /// Schema sync does not create secondary indexes, so they are added here.
    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let db = self.conn()?;
        let backend = db.get_database_backend();

        let indexes = [
            (
                "idx_contact_email_created",
                vec![contact::Column::Email, contact::Column::CreatedAt],
            ),
            ("idx_contact_status", vec![contact::Column::Status]),
            (
                "idx_contact_session_created",
                vec![contact::Column::SessionId, contact::Column::CreatedAt],
            ),
            ("idx_contact_created", vec![contact::Column::CreatedAt]),
            (
                "idx_contact_service_interest",
                vec![contact::Column::ServiceInterest],
            ),
        ];

        for (name, columns) in indexes {
            let mut stmt = Index::create();
            stmt.if_not_exists().name(name).table(contact::Entity);
            for column in columns {
                stmt.col(column);
            }
            self.guarded(db.execute_raw(backend.build(&stmt))).await?;
            info!(index = name, "Ensured index exists");
        }

        Ok(())
    }
}
