//! Column definitions, in export order.

use std::sync::Arc;

use bigdecimal::BigDecimal;
use brokercsv_core::convert::{CurrencyConverter, DecimalConverter, StringConverter, TemporalConverter};
use brokercsv_core::{Error, Field, FieldSchema, RecordSchema, Result};
use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;

pub static DATE: Lazy<Field<NaiveDate>> = Lazy::new(|| {
    Field::new("DATE", 0)
        .with_nullable(false)
        .with_converter(TemporalConverter::date("%d-%m-%Y"))
});

pub static TIME: Lazy<Field<NaiveTime>> = Lazy::new(|| {
    Field::new("TIME", 1)
        .with_nullable(false)
        .with_converter(TemporalConverter::time("%H:%M"))
});

pub static NAME: Lazy<Field<String>> = Lazy::new(|| text("NAME", 2, false));
pub static ISIN: Lazy<Field<String>> = Lazy::new(|| text("ISIN", 3, false));
pub static EXCHANGE: Lazy<Field<String>> = Lazy::new(|| text("EXCHANGE", 4, false));
pub static EXECUTION_CENTER: Lazy<Field<String>> = Lazy::new(|| text("EXECUTION_CENTER", 5, true));

pub static QUANTITY: Lazy<Field<BigDecimal>> = Lazy::new(|| decimal("QUANTITY", 6, false));
pub static PRICE_PER_UNIT: Lazy<Field<BigDecimal>> = Lazy::new(|| decimal("PRICE_PER_UNIT", 7, false));
pub static PRICE_PER_UNIT_CURRENCY: Lazy<Field<String>> =
    Lazy::new(|| currency("PRICE_PER_UNIT_CURRENCY", 8, false));

pub static LOCAL_VALUE: Lazy<Field<BigDecimal>> = Lazy::new(|| decimal("LOCAL_VALUE", 9, false));
pub static LOCAL_VALUE_CURRENCY: Lazy<Field<String>> =
    Lazy::new(|| currency("LOCAL_VALUE_CURRENCY", 10, false));

pub static VALUE: Lazy<Field<BigDecimal>> = Lazy::new(|| decimal("VALUE", 11, false));
pub static VALUE_CURRENCY: Lazy<Field<String>> = Lazy::new(|| currency("VALUE_CURRENCY", 12, false));

pub static EXCHANGE_RATE: Lazy<Field<BigDecimal>> = Lazy::new(|| decimal("EXCHANGE_RATE", 13, false));

// Costs are missing for orders executed without fees.
pub static COSTS: Lazy<Field<BigDecimal>> = Lazy::new(|| decimal("COSTS", 14, true));
pub static COSTS_CURRENCY: Lazy<Field<String>> = Lazy::new(|| currency("COSTS_CURRENCY", 15, true));

pub static TOTAL: Lazy<Field<BigDecimal>> = Lazy::new(|| decimal("TOTAL", 16, false));
pub static TOTAL_CURRENCY: Lazy<Field<String>> = Lazy::new(|| currency("TOTAL_CURRENCY", 17, false));

pub static ORDER_ID: Lazy<Field<String>> = Lazy::new(|| text("ORDER_ID", 18, true));

static SCHEMA: Lazy<std::result::Result<Arc<RecordSchema>, String>> =
    Lazy::new(|| RecordSchema::new(fields()).map(Arc::new).map_err(|e| e.to_string()));

fn text(name: &str, ordinal: usize, nullable: bool) -> Field<String> {
    Field::new(name, ordinal)
        .with_nullable(nullable)
        .with_converter(StringConverter)
}

fn decimal(name: &str, ordinal: usize, nullable: bool) -> Field<BigDecimal> {
    Field::new(name, ordinal)
        .with_nullable(nullable)
        .with_converter(DecimalConverter::DECIMAL_POINT)
}

fn currency(name: &str, ordinal: usize, nullable: bool) -> Field<String> {
    Field::new(name, ordinal)
        .with_nullable(nullable)
        .with_converter(CurrencyConverter)
}

/// All columns in ordinal order.
pub fn fields() -> Vec<FieldSchema> {
    vec![
        DATE.schema().clone(),
        TIME.schema().clone(),
        NAME.schema().clone(),
        ISIN.schema().clone(),
        EXCHANGE.schema().clone(),
        EXECUTION_CENTER.schema().clone(),
        QUANTITY.schema().clone(),
        PRICE_PER_UNIT.schema().clone(),
        PRICE_PER_UNIT_CURRENCY.schema().clone(),
        LOCAL_VALUE.schema().clone(),
        LOCAL_VALUE_CURRENCY.schema().clone(),
        VALUE.schema().clone(),
        VALUE_CURRENCY.schema().clone(),
        EXCHANGE_RATE.schema().clone(),
        COSTS.schema().clone(),
        COSTS_CURRENCY.schema().clone(),
        TOTAL.schema().clone(),
        TOTAL_CURRENCY.schema().clone(),
        ORDER_ID.schema().clone(),
    ]
}

/// Shared schema over [`fields`], built once.
pub fn schema() -> Result<Arc<RecordSchema>> {
    SCHEMA
        .as_ref()
        .map(Arc::clone)
        .map_err(|e| Error::Schema(format!("DEGIRO schema: {e}")))
}
