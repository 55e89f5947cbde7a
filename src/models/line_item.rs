//! Line item model for earnings and deductions.
//!
//! A payslip carries two ordered lists of [`LineItem`]s. Three of them are
//! anchors that drive derived computation: the Professional Fee earning and
//! the LOP and Taxes deductions. Anchors are identified by [`LineItemKind`];
//! labels are only consulted when tagging payloads that predate the kind field.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifies the role a line item plays in derivation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    /// The earnings anchor representing base contracted pay for the period.
    ProfessionalFee,
    /// The loss-of-pay deduction anchor.
    Lop,
    /// The tax deduction anchor.
    Taxes,
    /// Any user-defined earning or deduction.
    #[default]
    Custom,
}

impl LineItemKind {
    /// Returns true for the three anchor kinds.
    pub fn is_anchor(self) -> bool {
        self != LineItemKind::Custom
    }
}

/// Which of the two line item lists an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemSide {
    /// The earnings list.
    Earnings,
    /// The deductions list.
    Deductions,
}

impl fmt::Display for LineItemSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineItemSide::Earnings => write!(f, "earnings"),
            LineItemSide::Deductions => write!(f, "deductions"),
        }
    }
}

/// A single earning or deduction row.
///
/// The label is serialized as `type` and is not guaranteed to be unique.
///
/// # Example
///
/// ```
/// use payslip_engine::models::{LineItem, LineItemKind};
/// use rust_decimal::Decimal;
///
/// let fee = LineItem::anchor(LineItemKind::ProfessionalFee, "Professional Fee", Decimal::from(45000));
/// assert!(fee.is_anchor());
///
/// let bonus = LineItem::new("Bonus", Decimal::from(2000));
/// assert_eq!(bonus.kind, LineItemKind::Custom);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The display label.
    #[serde(rename = "type")]
    pub label: String,
    /// The whole-number amount.
    pub amount: Decimal,
    /// The derivation role of this item.
    #[serde(default)]
    pub kind: LineItemKind,
}

impl LineItem {
    /// Creates a custom (non-anchor) line item.
    pub fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
            kind: LineItemKind::Custom,
        }
    }

    /// Creates a line item of the given kind.
    pub fn anchor(kind: LineItemKind, label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
            kind,
        }
    }

    /// Returns true if this item is one of the derivation anchors.
    pub fn is_anchor(&self) -> bool {
        self.kind.is_anchor()
    }
}

/// Returns the index of the first item of `kind` in `items`.
pub fn find_anchor(items: &[LineItem], kind: LineItemKind) -> Option<usize> {
    items.iter().position(|item| item.kind == kind)
}

/// Tags the first custom item whose label equals `label` as `kind`.
///
/// Does nothing when an item of `kind` is already present.
pub fn tag_by_label(items: &mut [LineItem], kind: LineItemKind, label: &str) {
    if find_anchor(items, kind).is_some() {
        return;
    }
    if let Some(item) = items
        .iter_mut()
        .find(|item| item.kind == LineItemKind::Custom && item.label == label)
    {
        item.kind = kind;
    }
}
