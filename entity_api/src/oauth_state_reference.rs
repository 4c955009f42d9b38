use super::error::Error;
use entity::oauth_state_references::{ActiveModel, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Set, ConnectionTrait, QuerySelect};

/// Inserts a new state reference, keeping the caller's `created_at`. Fails with
/// `RecordAlreadyExists` if the id is taken.
pub async fn create(db: &impl ConnectionTrait, model: Model) -> Result<Model, Error> {
    debug!("Creating OAuth state reference: {}", model.id);

    let active_model = ActiveModel {
        id: Set(model.id),
        referrer: Set(model.referrer),
        created_at: Set(model.created_at),
    };

    Ok(active_model.insert(db).await?)
}

/// Loads a state reference and takes a row lock (`SELECT ... FOR UPDATE`) so concurrent
/// transactions consuming the same state reference are serialized. Backends without row
/// locking (SQLite) serialize whole write transactions instead.
pub async fn find_by_id_for_update(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .lock_exclusive()
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// Removes a state reference. A delete that matches no row is reported as `RecordNotFound`,
/// which is what a losing concurrent consumer observes.
pub async fn delete_by_id(db: &impl ConnectionTrait, id: Id) -> Result<(), Error> {
    let result = Entity::delete_by_id(id).exec(db).await?;

    if result.rows_affected == 0 {
        debug!("OAuth state reference {id} was already removed");
        return Err(Error::not_found());
    }

    Ok(())
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn test_model() -> Model {
        Model {
            id: Id::new_v4(),
            referrer: "https://app.example.com/dashboard".to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn create_returns_a_new_state_reference() -> Result<(), Error> {
        let model = test_model();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model.clone()]])
            .into_connection();

        let result = create(&db, model.clone()).await?;

        assert_eq!(result.id, model.id);
        assert_eq!(result.referrer, model.referrer);
        Ok(())
    }

    #[tokio::test]
    async fn create_inserts_the_callers_created_at() -> Result<(), Error> {
        let model = test_model();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model.clone()]])
            .into_connection();

        create(&db, model.clone()).await?;

        let log = db.into_transaction_log();
        let insert = &log[0].statements()[0];
        let expected: sea_orm::Value = model.created_at.into();
        assert!(insert.sql.starts_with(r#"INSERT INTO "oauth_state_references""#));
        assert!(insert
            .values
            .as_ref()
            .is_some_and(|values| values.0.contains(&expected)));
        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_for_update_returns_model_when_found() -> Result<(), Error> {
        let model = test_model();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model.clone()]])
            .into_connection();

        let result = find_by_id_for_update(&db, model.id).await?;
        assert_eq!(result, model);
        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_for_update_locks_the_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<Model, Vec<Model>, _>(vec![vec![]])
            .into_connection();

        let _ = find_by_id_for_update(&db, Id::new_v4()).await;

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let statements = log[0].statements();
        assert_eq!(statements.len(), 1);
        assert!(statements[0]
            .sql
            .starts_with(r#"SELECT "oauth_state_references"."id""#));
        assert!(statements[0].sql.ends_with("FOR UPDATE"));
    }

    #[tokio::test]
    async fn find_by_id_for_update_returns_not_found_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<Model, Vec<Model>, _>(vec![vec![]])
            .into_connection();

        let result = find_by_id_for_update(&db, Id::new_v4()).await;
        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn delete_by_id_executes_delete() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        delete_by_id(&db, Id::new_v4()).await?;
        Ok(())
    }

    #[tokio::test]
    async fn delete_by_id_returns_not_found_when_no_row_removed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = delete_by_id(&db, Id::new_v4()).await;
        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn transactional_propagates_callback_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<Model, Vec<Model>, _>(vec![vec![]])
            .into_connection();
        let id = Id::new_v4();

        let result = crate::transactional(&db, |txn| {
            Box::pin(async move {
                let model = find_by_id_for_update(txn, id).await?;
                Ok::<_, Error>(model.referrer)
            })
        })
        .await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }
}
