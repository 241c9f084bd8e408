// ============================================================================
// Contable Core - Document Entity
// File: crates/contable-core/src/domain/document.rs
// Description: Purchase-ledger tax document
// ============================================================================

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Digits after the decimal point the `documents` table keeps (`NUMERIC(18,4)`).
pub const AMOUNT_SCALE: u32 = 4;

/// Digits before the decimal point the `documents` table keeps.
pub const AMOUNT_INTEGER_DIGITS: u32 = 14;

/// A purchase-ledger tax document.
///
/// Wire names are PascalCase. The uppercase spellings used by older TaxDocument
/// clients (`RUTProveedor`, `MontoIVARecuperable`, ...) are accepted on input;
/// any other key is rejected. Any field may be omitted: text and dates become
/// `null`, amounts become zero. Amounts travel as JSON numbers (strings are
/// accepted on input). No relation between the amounts is enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default, deny_unknown_fields)]
pub struct Document {
    /// Assigned by the store; ignored on create.
    pub id: i32,

    pub tipo_doc: Option<String>,
    pub tipo_compra: Option<String>,
    #[serde(alias = "RUTProveedor")]
    pub rut_proveedor: Option<String>,
    pub razon_social: Option<String>,
    pub folio: Option<String>,

    #[serde(deserialize_with = "fecha::deserialize")]
    pub fecha_docto: Option<NaiveDate>,
    #[serde(deserialize_with = "fecha::deserialize")]
    pub fecha_recepcion: Option<NaiveDate>,
    #[serde(deserialize_with = "fecha::deserialize")]
    pub fecha_acuse: Option<NaiveDate>,

    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub monto_exento: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub monto_neto: Decimal,
    #[serde(
        alias = "MontoIVARecuperable",
        with = "rust_decimal::serde::arbitrary_precision"
    )]
    pub monto_iva_recuperable: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub monto_iva_no_recuperable: Decimal,
    #[serde(alias = "CodigoIVANoRec")]
    pub codigo_iva_no_rec: Option<String>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub monto_total: Decimal,

    // Extended TaxDocument fields
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub monto_neto_activo_fijo: Decimal,
    #[serde(
        alias = "IVAActivoFijo",
        with = "rust_decimal::serde::arbitrary_precision"
    )]
    pub iva_activo_fijo: Decimal,
    #[serde(
        alias = "IVAUsoComun",
        with = "rust_decimal::serde::arbitrary_precision"
    )]
    pub iva_uso_comun: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub impto_sin_derecho_a_credito: Decimal,
    #[serde(
        alias = "IVANoRetenido",
        with = "rust_decimal::serde::arbitrary_precision"
    )]
    pub iva_no_retenido: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub tabacos_puros: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub tabacos_cigarrillos: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub tabacos_elaborados: Decimal,
    #[serde(rename = "NCEoNDEsobreFactDeCompra")]
    pub nce_o_nde_sobre_fact_de_compra: Option<String>,
    pub codigo_otro_impuesto: Option<String>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub valor_otro_impuesto: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub tasa_otro_impuesto: Decimal,
}

impl Document {
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }

    fn amounts(&self) -> [(&'static str, Decimal); 15] {
        [
            ("MontoExento", self.monto_exento),
            ("MontoNeto", self.monto_neto),
            ("MontoIvaRecuperable", self.monto_iva_recuperable),
            ("MontoIvaNoRecuperable", self.monto_iva_no_recuperable),
            ("MontoTotal", self.monto_total),
            ("MontoNetoActivoFijo", self.monto_neto_activo_fijo),
            ("IvaActivoFijo", self.iva_activo_fijo),
            ("IvaUsoComun", self.iva_uso_comun),
            ("ImptoSinDerechoACredito", self.impto_sin_derecho_a_credito),
            ("IvaNoRetenido", self.iva_no_retenido),
            ("TabacosPuros", self.tabacos_puros),
            ("TabacosCigarrillos", self.tabacos_cigarrillos),
            ("TabacosElaborados", self.tabacos_elaborados),
            ("ValorOtroImpuesto", self.valor_otro_impuesto),
            ("TasaOtroImpuesto", self.tasa_otro_impuesto),
        ]
    }

    fn amounts_mut(&mut self) -> [&mut Decimal; 15] {
        [
            &mut self.monto_exento,
            &mut self.monto_neto,
            &mut self.monto_iva_recuperable,
            &mut self.monto_iva_no_recuperable,
            &mut self.monto_total,
            &mut self.monto_neto_activo_fijo,
            &mut self.iva_activo_fijo,
            &mut self.iva_uso_comun,
            &mut self.impto_sin_derecho_a_credito,
            &mut self.iva_no_retenido,
            &mut self.tabacos_puros,
            &mut self.tabacos_cigarrillos,
            &mut self.tabacos_elaborados,
            &mut self.valor_otro_impuesto,
            &mut self.tasa_otro_impuesto,
        ]
    }

    /// Wire name of the first amount the store cannot hold exactly: more than
    /// [`AMOUNT_SCALE`] decimals or [`AMOUNT_INTEGER_DIGITS`] integer digits.
    pub fn unstorable_amount(&self) -> Option<&'static str> {
        let limit = Decimal::from(10_i64.pow(AMOUNT_INTEGER_DIGITS));
        self.amounts()
            .into_iter()
            .find(|(_, amount)| amount.normalize().scale() > AMOUNT_SCALE || amount.abs() >= limit)
            .map(|(name, _)| name)
    }

    /// Drops trailing zeros, so `1000.0000` read back from a `NUMERIC(18,4)`
    /// column serializes as `1000`.
    pub fn normalized(mut self) -> Self {
        for amount in self.amounts_mut() {
            *amount = amount.normalize();
        }
        self
    }
}

/// Dates arrive as `YYYY-MM-DD` or as a midnight timestamp
/// (`2024-03-15T00:00:00`, optionally with an offset). They are always
/// written back as `YYYY-MM-DD`.
mod fecha {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
    use serde::{de::Error, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date: {}", raw))),
        }
    }

    pub(super) fn parse(raw: &str) -> Option<NaiveDate> {
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }

        let timestamp = raw
            .parse::<NaiveDateTime>()
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))?;

        (timestamp.time() == NaiveTime::MIN).then(|| timestamp.date())
    }
}
