//! Declarative column-name rules.
//!
//! One [`FieldRule`] per canonical field, each a list of predicates over the
//! lowercased column name. A single generic matcher evaluates them all; the
//! trailing fallback (column name equals the field id) applies to every rule.

use once_cell::sync::Lazy;

use crate::model::CanonicalField;

/// A predicate over a lowercased column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnPredicate {
    Exact(&'static str),
    Contains(&'static str),
    StartsWith(&'static str),
    EndsWith(&'static str),
}

impl ColumnPredicate {
    /// `lower` must already be lowercased.
    pub fn matches(&self, lower: &str) -> bool {
        match self {
            ColumnPredicate::Exact(s) => lower == *s,
            ColumnPredicate::Contains(s) => lower.contains(s),
            ColumnPredicate::StartsWith(s) => lower.starts_with(s),
            ColumnPredicate::EndsWith(s) => lower.ends_with(s),
        }
    }
}

/// Matching rules for one canonical field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: CanonicalField,
    /// Human-readable description.
    pub description: &'static str,
    predicates: Vec<ColumnPredicate>,
}

impl FieldRule {
    pub fn new(
        field: CanonicalField,
        description: &'static str,
        predicates: Vec<ColumnPredicate>,
    ) -> Self {
        Self {
            field,
            description,
            predicates,
        }
    }

    pub fn predicates(&self) -> &[ColumnPredicate] {
        &self.predicates
    }

    /// Case-insensitive match of `column` against this rule.
    pub fn matches(&self, column: &str) -> bool {
        let lower = column.to_lowercase();
        self.predicates.iter().any(|p| p.matches(&lower)) || lower == self.field.as_str()
    }
}

/// Built-in rules, one per canonical field in declaration order.
pub static DEFAULT_FIELD_RULES: Lazy<Vec<FieldRule>> = Lazy::new(default_field_rules);

/// Returns the default rule table.
pub fn default_field_rules() -> Vec<FieldRule> {
    use ColumnPredicate::{Contains, EndsWith, Exact, StartsWith};

    vec![
        FieldRule::new(
            CanonicalField::Id,
            "Row identifier (id, product_id, article_id, item_id)",
            vec![
                Exact("id"),
                Exact("product_id"),
                Exact("article_id"),
                Exact("item_id"),
            ],
        ),
        FieldRule::new(
            CanonicalField::Reference,
            "Article reference or SKU (reference, *ref*, code_article, sku)",
            vec![
                Exact("reference"),
                Contains("ref"),
                Contains("articlenr"),
                Contains("code_article"),
                Contains("product_code"),
                Contains("sku"),
            ],
        ),
        FieldRule::new(
            CanonicalField::Barcode,
            "Scannable code (barcode, code_barre, upc, gtin)",
            vec![
                Exact("barcode"),
                Contains("code_barre"),
                Contains("codebarre"),
                Contains("upc"),
                Contains("gtin"),
            ],
        ),
        FieldRule::new(
            CanonicalField::Description,
            "Free-text description (desc*, designation, libelle, omschrijving)",
            vec![
                Exact("description"),
                Contains("desc"),
                Contains("designation"),
                Contains("libelle"),
                Contains("omschrijving"),
            ],
        ),
        FieldRule::new(
            CanonicalField::Brand,
            "Brand or manufacturer (brand, marque, merk, fabricant)",
            vec![
                Exact("brand"),
                Contains("brand"),
                Contains("marque"),
                Contains("merk"),
                Contains("manufacturer"),
                Contains("fabricant"),
            ],
        ),
        FieldRule::new(
            CanonicalField::SupplierCode,
            "Supplier identifier (supplier, fournisseur, leverancier, vendor)",
            vec![
                Exact("supplier_code"),
                Contains("supplier"),
                Contains("fournisseur"),
                Contains("leverancier"),
                Contains("vendor"),
            ],
        ),
        FieldRule::new(
            CanonicalField::Name,
            "Product name (name, product_name, item_name, nom_produit, title)",
            vec![
                Exact("name"),
                Exact("product_name"),
                Exact("item_name"),
                Exact("nom_produit"),
                Exact("productnaam"),
                Exact("title"),
            ],
        ),
        FieldRule::new(
            CanonicalField::Price,
            "Price or cost (price, prix, prijs, cost, tarif)",
            vec![
                Exact("price"),
                Contains("price"),
                Contains("prix"),
                Contains("prijs"),
                Contains("cost"),
                Contains("tarif"),
            ],
        ),
        FieldRule::new(
            CanonicalField::Stock,
            "Quantity on hand (stock, qty, quantity, quantite, voorraad, inventory)",
            vec![
                Exact("stock"),
                Contains("stock"),
                Contains("qty"),
                Contains("quantity"),
                Contains("quantite"),
                Contains("voorraad"),
                Contains("inventory"),
            ],
        ),
        FieldRule::new(
            CanonicalField::Location,
            "Storage location (location, emplacement, locatie, warehouse, shelf)",
            vec![
                Exact("location"),
                Contains("location"),
                Contains("emplacement"),
                Contains("locatie"),
                Contains("warehouse"),
                Contains("shelf"),
            ],
        ),
        FieldRule::new(
            CanonicalField::Ean,
            "EAN code (ean, eannr, ean13, ean_*, *_ean)",
            vec![
                Exact("ean"),
                Exact("eannr"),
                Exact("ean13"),
                Exact("ean_code"),
                StartsWith("ean_"),
                EndsWith("_ean"),
            ],
        ),
    ]
}
