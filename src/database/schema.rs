//! Bootstrap del schema
//!
//! Crea las tablas al arrancar si no existen, igual que hace la capa de
//! inicialización del sistema de sucursales. El historial de estados es
//! append-only: no existe ningún UPDATE ni DELETE contra esa tabla en todo
//! el código; su `id` BIGSERIAL desempata entries con el mismo timestamp.

use sqlx::PgPool;

const SCHEMA_STATEMENTS: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS branch (
        id UUID PRIMARY KEY,
        branch_code TEXT UNIQUE NOT NULL,
        country TEXT NOT NULL,
        county TEXT NOT NULL,
        location TEXT NOT NULL,
        street_building TEXT NOT NULL,
        postal_code TEXT,
        contact TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS staff (
        id UUID PRIMARY KEY,
        employee_id TEXT UNIQUE NOT NULL,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT UNIQUE NOT NULL,
        branch_id UUID REFERENCES branch(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS parcel (
        id UUID PRIMARY KEY,
        tracking_number TEXT UNIQUE NOT NULL,
        sender_name TEXT NOT NULL,
        sender_address TEXT NOT NULL,
        sender_email TEXT,
        sender_phone TEXT,
        recipient_name TEXT NOT NULL,
        recipient_address TEXT NOT NULL,
        recipient_email TEXT,
        recipient_phone TEXT,
        weight DOUBLE PRECISION NOT NULL,
        delicacy TEXT NOT NULL,
        size TEXT NOT NULL,
        price NUMERIC(10, 2) NOT NULL DEFAULT 0,
        current_status TEXT NOT NULL,
        pickup_branch_id UUID REFERENCES branch(id),
        delivery_branch_id UUID REFERENCES branch(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS parcel_status_history (
        id BIGSERIAL PRIMARY KEY,
        parcel_id UUID NOT NULL REFERENCES parcel(id),
        status TEXT NOT NULL,
        location TEXT,
        comments TEXT,
        recorded_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

/// Inicializar las tablas del sistema
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_history_parcel
         ON parcel_status_history (parcel_id, recorded_at DESC, id DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
