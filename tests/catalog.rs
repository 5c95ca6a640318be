use std::sync::Arc;

use cardui::prelude::*;
use cardui::validator::{BrandInfo, Pattern, SecurityCode, ValidatorParams, default_catalog};

const STORE_CARD: &str = r#"[
    {
        "niceType": "Store Card",
        "type": "store-card",
        "patterns": [9911, [9920, 9929]],
        "gaps": [4, 8],
        "lengths": [12],
        "code": { "name": "PIN", "size": 4 }
    },
    {
        "niceType": "Broken",
        "type": "broken",
        "patterns": [8],
        "gaps": [],
        "lengths": [],
        "code": { "name": "CVV", "size": 3 }
    }
]"#;

#[test]
fn custom_table_drives_the_form() {
    let catalog = BrandCatalog::from_json(STORE_CARD).unwrap();
    assert_eq!(catalog.len(), 1, "entries without lengths are skipped");

    let options = UiOptions::default().with_catalog(catalog);
    let mut ui = CardUI::new(options);
    let form = ui.form_mut();
    form.set_text(FieldId::Number, "992512345678");
    assert_eq!(form.card().brand_type, "store-card");
    assert_eq!(form.text(FieldId::Number), "9925 1234 5678");
    assert_eq!(form.placeholder(FieldId::Cvc), "PIN");
    assert_eq!(form.cvc().max_length(), Some(4));
}

#[test]
fn unordered_gaps_are_rejected() {
    let source = STORE_CARD.replace("\"gaps\": [4, 8]", "\"gaps\": [8, 4]");
    let err = BrandCatalog::from_json(&source).unwrap_err();
    assert!(err.to_string().contains("no usable brand entries"));

    let mut catalog = default_catalog().clone();
    assert!(catalog.update_card("visa", |visa| visa.gaps = vec![8, 4]).is_err());
    assert!(catalog.update_card("visa", |visa| visa.gaps = vec![4, 4]).is_err());
    assert_eq!(
        catalog.type_info("visa").map(|visa| visa.gaps.clone()),
        Some(vec![4, 8, 12])
    );

    let mut ui = CardUI::new(UiOptions::default().with_catalog(catalog));
    let form = ui.form_mut();
    form.set_text(FieldId::Number, "4123456789012");
    assert_eq!(form.text(FieldId::Number), "4123 4567 8901 2");
    assert_eq!(form.value().map(|value| value.number), Some("4123456789012".to_string()));
}

#[test]
fn malformed_tables_are_rejected() {
    assert!(BrandCatalog::from_json("{}").is_err());
    let err = BrandCatalog::from_json("[]").unwrap_err();
    assert!(err.to_string().contains("no usable brand entries"));
}

#[test]
fn catalog_edits_keep_order() {
    let mut catalog = default_catalog().clone();
    let first = catalog.brand_types().next().map(str::to_string);
    assert_eq!(first.as_deref(), Some("visa"));

    catalog.change_order("mastercard", 0).unwrap();
    assert_eq!(catalog.brand_types().next(), Some("mastercard"));

    let removed = catalog.remove_card("hiper").unwrap();
    assert_eq!(removed.nice_type, "Hiper");
    assert!(catalog.type_info("hiper").is_none());
    assert!(catalog.remove_card("hiper").is_err());

    catalog
        .update_card("visa", |visa| visa.code.size = 4)
        .unwrap();
    assert_eq!(catalog.type_info("visa").map(|visa| visa.code.size), Some(4));
    assert!(catalog.update_card("visa", |visa| visa.lengths.clear()).is_err());

    catalog
        .add_card(BrandInfo {
            nice_type: "Store Card".to_string(),
            brand_type: "store-card".to_string(),
            patterns: vec![Pattern::Prefix(9911)],
            gaps: vec![4, 8],
            lengths: vec![12],
            code: SecurityCode {
                name: "PIN".to_string(),
                size: 4,
            },
            match_strength: None,
        })
        .unwrap();
    assert_eq!(catalog.brand_types().last(), Some("store-card"));

    let validator = DefaultValidator::new().with_catalog(Arc::new(catalog));
    let verdict = validator.card_number("9911", &ValidatorParams::new());
    assert_eq!(
        verdict.card.map(|card| card.brand_type),
        Some("store-card".to_string())
    );
}
