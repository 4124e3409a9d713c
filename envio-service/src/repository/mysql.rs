//! Stored-procedure backed repository.

use async_trait::async_trait;
use db::{DbPool, SqlParam};
use error::DatabaseError;

use super::EnvioRepository;
use crate::models::{EnvioInput, EnvioOut, EnvioRow, EstadoEnvio, Repartidor};

const SP_LISTAR_REPARTIDOR: &str = "CALL sp_cbox_listar_repartidor()";
const SP_LISTAR_ESTADO_ENVIO: &str = "CALL sp_cbox_listar_estado_envio()";
const SP_LISTAR_ENVIO: &str = "CALL sp_listar_envio()";
const SP_LISTAR_ENVIO_POR_ID: &str = "CALL sp_listar_envio_por_id(?)";
const SP_CREAR_ENVIO: &str = "CALL sp_crear_envio(?, ?, ?, ?, ?, ?)";
const SP_ACTUALIZAR_ENVIO: &str = "CALL sp_actualizar_envio(?, ?, ?, ?, ?, ?, ?)";
const SP_ELIMINAR_ENVIO: &str = "CALL sp_eliminar_envio(?)";
const LAST_INSERT_ID: &str = "SELECT LAST_INSERT_ID()";

/// Repository that maps every operation onto one stored procedure.
#[derive(Clone)]
pub struct MySqlRepository {
    pool: DbPool,
}

impl MySqlRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Positional arguments shared by `sp_crear_envio` and `sp_actualizar_envio`.
fn envio_params(input: &EnvioInput) -> Vec<SqlParam> {
    vec![
        SqlParam::from(input.remitente.as_str()),
        SqlParam::from(input.destinatario.as_str()),
        SqlParam::from(input.direccion_envio.as_str()),
        SqlParam::from(input.fecha_envio),
        SqlParam::from(input.repartidor_id),
        SqlParam::from(input.estado_id),
    ]
}

#[async_trait]
impl EnvioRepository for MySqlRepository {
    async fn list_repartidores(&self) -> Result<Vec<Repartidor>, DatabaseError> {
        db::execute(&self.pool, SP_LISTAR_REPARTIDOR, &[])
            .await?
            .decode_all()
    }

    async fn list_estados_envio(&self) -> Result<Vec<EstadoEnvio>, DatabaseError> {
        db::execute(&self.pool, SP_LISTAR_ESTADO_ENVIO, &[])
            .await?
            .decode_all()
    }

    async fn list_envios(&self) -> Result<Vec<EnvioOut>, DatabaseError> {
        let rows = db::execute(&self.pool, SP_LISTAR_ENVIO, &[])
            .await?
            .decode_all::<EnvioRow>()?;
        Ok(rows.into_iter().map(EnvioOut::from).collect())
    }

    async fn find_envio(&self, envio_id: i64) -> Result<Option<EnvioOut>, DatabaseError> {
        let row = db::execute(&self.pool, SP_LISTAR_ENVIO_POR_ID, &[envio_id.into()])
            .await?
            .decode_first::<EnvioRow>()?;
        Ok(row.map(EnvioOut::from))
    }

    async fn create_envio(&self, input: &EnvioInput) -> Result<i64, DatabaseError> {
        // LAST_INSERT_ID() is per session, so both statements share one connection.
        let mut conn = db::acquire(&self.pool).await?;
        db::execute_on(&mut conn, SP_CREAR_ENVIO, &envio_params(input)).await?;

        let last_id = db::execute_on(&mut conn, LAST_INSERT_ID, &[])
            .await?
            .first_value::<u64>()?
            .unwrap_or(0);

        if last_id == 0 {
            return Err(DatabaseError::QueryFailed(
                "sp_crear_envio did not insert a row".to_string(),
            ));
        }
        i64::try_from(last_id)
            .map_err(|_| DatabaseError::Decode(format!("insert id {} out of range", last_id)))
    }

    async fn update_envio(&self, envio_id: i64, input: &EnvioInput) -> Result<(), DatabaseError> {
        let mut params = envio_params(input);
        params.push(SqlParam::from(envio_id));
        db::execute(&self.pool, SP_ACTUALIZAR_ENVIO, &params).await?;
        Ok(())
    }

    async fn delete_envio(&self, envio_id: i64) -> Result<(), DatabaseError> {
        db::execute(&self.pool, SP_ELIMINAR_ENVIO, &[envio_id.into()]).await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        db::health_check(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_input() -> EnvioInput {
        EnvioInput {
            remitente: "A".to_string(),
            destinatario: "B".to_string(),
            direccion_envio: "X".to_string(),
            fecha_envio: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            repartidor_id: 1,
            estado_id: 1,
        }
    }

    #[test]
    fn test_params_follow_procedure_order() {
        let input = sample_input();
        let params = envio_params(&input);
        assert_eq!(params.len(), SP_CREAR_ENVIO.matches('?').count());
        assert_eq!(params[0], SqlParam::Text("A".to_string()));
        assert_eq!(params[2], SqlParam::Text("X".to_string()));
        assert_eq!(params[3], SqlParam::DateTime(input.fecha_envio));
        assert_eq!(params[5], SqlParam::Int(1));
        assert_eq!(params.len() + 1, SP_ACTUALIZAR_ENVIO.matches('?').count());
    }

    #[tokio::test]
    #[ignore = "requires database with the envios stored procedures"]
    async fn test_create_get_delete_roundtrip() {
        let config = db::DbConfig::from_env().expect("DB_* variables required");
        let pool = db::create_pool(&config).await.expect("pool creation failed");
        let repo = MySqlRepository::new(pool);

        let id = repo.create_envio(&sample_input()).await.expect("create failed");
        assert!(id > 0);

        let found = repo.find_envio(id).await.expect("lookup failed").expect("missing row");
        assert_eq!(found.remitente, "A");
        assert_eq!(found.fecha_envio, "2024-01-01T10:00:00");

        repo.delete_envio(id).await.expect("delete failed");
        assert!(repo.find_envio(id).await.expect("lookup failed").is_none());
    }
}
