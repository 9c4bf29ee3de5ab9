//! DEGIRO transactions export end to end.

use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use brokercsv::degiro::{fields, DegiroProvider, BROKER_ID};
use brokercsv::{Record, ValueType};
use chrono::{NaiveDate, NaiveTime};

const HEADER: &str = "Datum,Tijd,Product,ISIN,Beurs,Uitvoeringsplaats,Aantal,Koers,,Lokale waarde,,Waarde,,Wisselkoers,Transactiekosten en/of,,Totaal,,Order ID";

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/degiro_transactions.csv")
}

fn extract_sample() -> Vec<Record> {
    let file = File::open(sample_path()).unwrap();
    DegiroProvider
        .extractor()
        .unwrap()
        .extract_reader(file)
        .collect::<Result<_, _>>()
        .unwrap()
}

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn text<'a>(record: &'a Record, field: &brokercsv::Field<String>) -> Option<&'a str> {
    record.value(field).unwrap().map(String::as_str)
}

#[test]
fn test_provider_settings() {
    let provider = DegiroProvider;
    assert_eq!(provider.broker_id(), BROKER_ID);
    assert_eq!(BROKER_ID, "DEGIRO");

    let config = provider.config();
    assert_eq!(config.field_separator, ',');
    assert_eq!(config.skip_count, 1);

    let extractor = provider.extractor().unwrap();
    assert_eq!(extractor.charset().name(), "ISO-8859-1");
    assert_eq!(extractor.schema().field_count(), 19);
}

#[test]
fn test_schema_types() {
    let schema = DegiroProvider.schema().unwrap();
    let types: Vec<ValueType> = schema.fields().iter().map(|f| f.value_type()).collect();
    assert_eq!(types[0], ValueType::Date);
    assert_eq!(types[1], ValueType::Time);
    assert_eq!(types[6], ValueType::Decimal);
    assert_eq!(types[18], ValueType::Text);
}

#[test]
fn test_sample_export() {
    let records = extract_sample();
    assert_eq!(records.len(), 3);

    let r = &records[0];
    assert_eq!(
        r.value(&fields::DATE).unwrap(),
        Some(&NaiveDate::from_ymd_opt(2022, 7, 20).unwrap())
    );
    assert_eq!(
        r.value(&fields::TIME).unwrap(),
        Some(&NaiveTime::from_hms_opt(18, 12, 0).unwrap())
    );
    assert_eq!(text(r, &fields::NAME), Some("AMAZON.COM INC. - COM"));
    assert_eq!(text(r, &fields::ISIN), Some("US0231351067"));
    assert_eq!(text(r, &fields::EXCHANGE), Some("NDQ"));
    assert_eq!(text(r, &fields::EXECUTION_CENTER), Some("CDED"));
    assert_eq!(r.value(&fields::QUANTITY).unwrap(), Some(&dec("1")));
    assert_eq!(r.value(&fields::PRICE_PER_UNIT).unwrap(), Some(&dec("122.68")));
    assert_eq!(text(r, &fields::PRICE_PER_UNIT_CURRENCY), Some("USD"));
    assert_eq!(r.value(&fields::LOCAL_VALUE).unwrap(), Some(&dec("-245.36")));
    assert_eq!(text(r, &fields::LOCAL_VALUE_CURRENCY), Some("USD"));
    assert_eq!(r.value(&fields::VALUE).unwrap(), Some(&dec("-240.20")));
    assert_eq!(text(r, &fields::VALUE_CURRENCY), Some("EUR"));
    assert_eq!(r.value(&fields::EXCHANGE_RATE).unwrap(), Some(&dec("1.0215")));
    assert_eq!(r.value(&fields::COSTS).unwrap(), Some(&dec("-0.50")));
    assert_eq!(text(r, &fields::COSTS_CURRENCY), Some("EUR"));
    assert_eq!(r.value(&fields::TOTAL).unwrap(), Some(&dec("-240.90")));
    assert_eq!(text(r, &fields::TOTAL_CURRENCY), Some("EUR"));
    assert_eq!(
        text(r, &fields::ORDER_ID),
        Some("0d71cb9d-1879-43cc-838b-bfd845a81856")
    );

    // order without execution center, costs and order id
    let r = &records[1];
    assert_eq!(
        r.value(&fields::TIME).unwrap(),
        Some(&NaiveTime::from_hms_opt(0, 0, 0).unwrap())
    );
    assert_eq!(text(r, &fields::EXECUTION_CENTER), None);
    assert_eq!(r.value(&fields::QUANTITY).unwrap(), Some(&dec("6")));
    assert_eq!(r.value(&fields::COSTS).unwrap(), None);
    assert_eq!(text(r, &fields::COSTS_CURRENCY), None);
    assert_eq!(r.value(&fields::TOTAL).unwrap(), Some(&dec("-703.56")));
    assert_eq!(text(r, &fields::ORDER_ID), None);

    // Latin-1 encoded product name
    let r = &records[2];
    assert_eq!(text(r, &fields::NAME), Some("SOCI\u{C9}T\u{C9} G\u{C9}N\u{C9}RALE"));
    assert_eq!(r.value(&fields::QUANTITY).unwrap(), Some(&dec("-10")));
}

#[test]
fn test_record_as_json() {
    let records = extract_sample();
    let json = serde_json::to_value(&records[1]).unwrap();
    assert_eq!(json["DATE"], "2022-06-06");
    assert_eq!(json["TIME"], "00:00:00");
    assert_eq!(json["ISIN"], "US0231351067");
    assert_eq!(json["TOTAL_CURRENCY"], "EUR");
    assert!(json["COSTS"].is_null());
    assert!(json["ORDER_ID"].is_null());
}

#[test]
fn test_missing_total_currency_is_rejected() {
    let input = format!("{HEADER}\n\
        06-06-2022,00:00,AMAZON.COM INC. - COM,US0231351067,NDQ,,6,\"122.3500\",USD,\"-734.10\",USD,\"-703.56\",EUR,1.0434,,,\"-703.56\",,");
    let err = DegiroProvider
        .extractor()
        .unwrap()
        .extract_str(&input)
        .next()
        .unwrap()
        .unwrap_err();
    let e = err.as_extraction().unwrap();
    assert_eq!((e.record_no(), e.line_no(), e.field_no()), (2, 2, 18));
    assert_eq!(e.message(), "Non-nullable field 18 in record 2 contains null value");
}

#[test]
fn test_invalid_date_is_rejected() {
    let input = format!("{HEADER}\n\
        2022-06-06,00:00,X,US0231351067,NDQ,,6,1,USD,1,USD,1,EUR,1,,,1,EUR,");
    let err = DegiroProvider
        .extractor()
        .unwrap()
        .extract_str(&input)
        .next()
        .unwrap()
        .unwrap_err();
    let e = err.as_extraction().unwrap();
    assert_eq!(e.field_no(), 1);
    assert_eq!(e.invalid_value(), Some("2022-06-06"));
    assert_eq!(e.line_pos(), 11);
}
