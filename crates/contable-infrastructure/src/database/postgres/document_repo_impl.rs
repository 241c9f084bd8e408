// ============================================================================
// Contable Infrastructure - PostgreSQL Document Repository
// File: crates/contable-infrastructure/src/database/postgres/document_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::info;

use contable_core::domain::Document;
use contable_core::error::DomainError;
use contable_core::repositories::DocumentRepository;

use crate::database::connection::map_sqlx_error;

pub struct PgDocumentRepository {
    pool: PgPool,
}

impl PgDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping. NUMERIC(18,4) columns come back with
// scale 4; conversion strips the padding.
#[derive(Debug, FromRow)]
struct DocumentRow {
    pub id: i32,
    pub tipo_doc: Option<String>,
    pub tipo_compra: Option<String>,
    pub rut_proveedor: Option<String>,
    pub razon_social: Option<String>,
    pub folio: Option<String>,
    pub fecha_docto: Option<NaiveDate>,
    pub fecha_recepcion: Option<NaiveDate>,
    pub fecha_acuse: Option<NaiveDate>,
    pub monto_exento: Decimal,
    pub monto_neto: Decimal,
    pub monto_iva_recuperable: Decimal,
    pub monto_iva_no_recuperable: Decimal,
    pub codigo_iva_no_rec: Option<String>,
    pub monto_total: Decimal,
    pub monto_neto_activo_fijo: Decimal,
    pub iva_activo_fijo: Decimal,
    pub iva_uso_comun: Decimal,
    pub impto_sin_derecho_a_credito: Decimal,
    pub iva_no_retenido: Decimal,
    pub tabacos_puros: Decimal,
    pub tabacos_cigarrillos: Decimal,
    pub tabacos_elaborados: Decimal,
    pub nce_o_nde_sobre_fact_de_compra: Option<String>,
    pub codigo_otro_impuesto: Option<String>,
    pub valor_otro_impuesto: Decimal,
    pub tasa_otro_impuesto: Decimal,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            tipo_doc: row.tipo_doc,
            tipo_compra: row.tipo_compra,
            rut_proveedor: row.rut_proveedor,
            razon_social: row.razon_social,
            folio: row.folio,
            fecha_docto: row.fecha_docto,
            fecha_recepcion: row.fecha_recepcion,
            fecha_acuse: row.fecha_acuse,
            monto_exento: row.monto_exento,
            monto_neto: row.monto_neto,
            monto_iva_recuperable: row.monto_iva_recuperable,
            monto_iva_no_recuperable: row.monto_iva_no_recuperable,
            codigo_iva_no_rec: row.codigo_iva_no_rec,
            monto_total: row.monto_total,
            monto_neto_activo_fijo: row.monto_neto_activo_fijo,
            iva_activo_fijo: row.iva_activo_fijo,
            iva_uso_comun: row.iva_uso_comun,
            impto_sin_derecho_a_credito: row.impto_sin_derecho_a_credito,
            iva_no_retenido: row.iva_no_retenido,
            tabacos_puros: row.tabacos_puros,
            tabacos_cigarrillos: row.tabacos_cigarrillos,
            tabacos_elaborados: row.tabacos_elaborados,
            nce_o_nde_sobre_fact_de_compra: row.nce_o_nde_sobre_fact_de_compra,
            codigo_otro_impuesto: row.codigo_otro_impuesto,
            valor_otro_impuesto: row.valor_otro_impuesto,
            tasa_otro_impuesto: row.tasa_otro_impuesto,
        }
        .normalized()
    }
}

const SELECT_SQL: &str = r#"
    SELECT
        id, tipo_doc, tipo_compra, rut_proveedor, razon_social, folio,
        fecha_docto, fecha_recepcion, fecha_acuse,
        monto_exento, monto_neto, monto_iva_recuperable, monto_iva_no_recuperable,
        codigo_iva_no_rec, monto_total,
        monto_neto_activo_fijo, iva_activo_fijo, iva_uso_comun,
        impto_sin_derecho_a_credito, iva_no_retenido,
        tabacos_puros, tabacos_cigarrillos, tabacos_elaborados,
        nce_o_nde_sobre_fact_de_compra,
        codigo_otro_impuesto, valor_otro_impuesto, tasa_otro_impuesto
    FROM documents
"#;

const INSERT_SQL: &str = r#"
    INSERT INTO documents (
        tipo_doc, tipo_compra, rut_proveedor, razon_social, folio,
        fecha_docto, fecha_recepcion, fecha_acuse,
        monto_exento, monto_neto, monto_iva_recuperable, monto_iva_no_recuperable,
        codigo_iva_no_rec, monto_total,
        monto_neto_activo_fijo, iva_activo_fijo, iva_uso_comun,
        impto_sin_derecho_a_credito, iva_no_retenido,
        tabacos_puros, tabacos_cigarrillos, tabacos_elaborados,
        nce_o_nde_sobre_fact_de_compra,
        codigo_otro_impuesto, valor_otro_impuesto, tasa_otro_impuesto
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
            $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26)
    RETURNING
        id, tipo_doc, tipo_compra, rut_proveedor, razon_social, folio,
        fecha_docto, fecha_recepcion, fecha_acuse,
        monto_exento, monto_neto, monto_iva_recuperable, monto_iva_no_recuperable,
        codigo_iva_no_rec, monto_total,
        monto_neto_activo_fijo, iva_activo_fijo, iva_uso_comun,
        impto_sin_derecho_a_credito, iva_no_retenido,
        tabacos_puros, tabacos_cigarrillos, tabacos_elaborados,
        nce_o_nde_sobre_fact_de_compra,
        codigo_otro_impuesto, valor_otro_impuesto, tasa_otro_impuesto
"#;

// $1 is the id; the remaining placeholders follow the INSERT column order.
const UPDATE_SQL: &str = r#"
    UPDATE documents
    SET
        tipo_doc = $2,
        tipo_compra = $3,
        rut_proveedor = $4,
        razon_social = $5,
        folio = $6,
        fecha_docto = $7,
        fecha_recepcion = $8,
        fecha_acuse = $9,
        monto_exento = $10,
        monto_neto = $11,
        monto_iva_recuperable = $12,
        monto_iva_no_recuperable = $13,
        codigo_iva_no_rec = $14,
        monto_total = $15,
        monto_neto_activo_fijo = $16,
        iva_activo_fijo = $17,
        iva_uso_comun = $18,
        impto_sin_derecho_a_credito = $19,
        iva_no_retenido = $20,
        tabacos_puros = $21,
        tabacos_cigarrillos = $22,
        tabacos_elaborados = $23,
        nce_o_nde_sobre_fact_de_compra = $24,
        codigo_otro_impuesto = $25,
        valor_otro_impuesto = $26,
        tasa_otro_impuesto = $27
    WHERE id = $1
"#;

/// Binds every non-id column in INSERT order.
macro_rules! bind_document_fields {
    ($query:expr, $doc:expr) => {
        $query
            .bind(&$doc.tipo_doc)
            .bind(&$doc.tipo_compra)
            .bind(&$doc.rut_proveedor)
            .bind(&$doc.razon_social)
            .bind(&$doc.folio)
            .bind($doc.fecha_docto)
            .bind($doc.fecha_recepcion)
            .bind($doc.fecha_acuse)
            .bind($doc.monto_exento)
            .bind($doc.monto_neto)
            .bind($doc.monto_iva_recuperable)
            .bind($doc.monto_iva_no_recuperable)
            .bind(&$doc.codigo_iva_no_rec)
            .bind($doc.monto_total)
            .bind($doc.monto_neto_activo_fijo)
            .bind($doc.iva_activo_fijo)
            .bind($doc.iva_uso_comun)
            .bind($doc.impto_sin_derecho_a_credito)
            .bind($doc.iva_no_retenido)
            .bind($doc.tabacos_puros)
            .bind($doc.tabacos_cigarrillos)
            .bind($doc.tabacos_elaborados)
            .bind(&$doc.nce_o_nde_sobre_fact_de_compra)
            .bind(&$doc.codigo_otro_impuesto)
            .bind($doc.valor_otro_impuesto)
            .bind($doc.tasa_otro_impuesto)
    };
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn list(&self) -> Result<Vec<Document>, DomainError> {
        let sql = format!("{} ORDER BY id", SELECT_SQL);
        let rows: Vec<DocumentRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("listing documents", e))?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Document>, DomainError> {
        let sql = format!("{} WHERE id = $1", SELECT_SQL);
        let row: Option<DocumentRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("finding document by id", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn insert(&self, document: &Document) -> Result<Document, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("starting insert", e))?;

        let row: DocumentRow = bind_document_fields!(sqlx::query_as(INSERT_SQL), document)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("inserting document", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("committing insert", e))?;

        info!("Document row inserted: {}", row.id);
        Ok(row.into())
    }

    async fn update(&self, document: &Document) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("starting update", e))?;

        let result = bind_document_fields!(sqlx::query(UPDATE_SQL).bind(document.id), document)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("updating document", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("committing update", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, id: i32) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("starting delete", e))?;

        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("deleting document", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("committing delete", e))?;

        Ok(result.rows_affected() > 0)
    }
}
