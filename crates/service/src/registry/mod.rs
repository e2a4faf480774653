//! Gift registry domain: items visitors can claim, the claims themselves and
//! the categories the items are grouped by.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use models::{item, reservation};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

pub mod repository;
pub mod snapshot;
pub mod reservations;
pub mod items;

/// Public view of a reservation, keyed by item id in [`ReservationMap`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationView {
    pub name: String,
    pub contact: String,
    pub date: DateTime<FixedOffset>,
}

impl From<reservation::Model> for ReservationView {
    fn from(m: reservation::Model) -> Self {
        Self { name: m.name, contact: m.contact, date: m.created_at }
    }
}

pub type ReservationMap = BTreeMap<String, ReservationView>;

/// Key reservations by item, with dates shown in `offset` whatever the backend returned.
pub fn reservation_map(rows: Vec<reservation::Model>, offset: &FixedOffset) -> ReservationMap {
    rows.into_iter()
        .map(|r| {
            let key = r.item_id.clone();
            let mut view = ReservationView::from(r);
            view.date = view.date.with_timezone(offset);
            (key, view)
        })
        .collect()
}

/// Everything a page needs: items in id order, reservations, category names.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub items: Vec<item::Model>,
    pub reservations: ReservationMap,
    pub categories: Vec<String>,
}

/// Editable item fields as submitted by the admin form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemInput {
    pub name: String,
    pub description: Option<String>,
    pub link: String,
    pub category: String,
}

impl ItemInput {
    /// Trimmed copy with required fields checked and blank description dropped.
    pub fn validated(&self) -> Result<Self, ServiceError> {
        Ok(Self {
            name: item::validate_bounded("name", &self.name, item::NAME_MAX_LEN)?,
            description: item::normalize_description(self.description.as_deref()),
            link: item::validate_required("link", &self.link)?,
            category: models::category::validate_name(&self.category)?,
        })
    }
}

pub(crate) fn sort_items(items: &mut [item::Model]) {
    items.sort_by(|a, b| item::compare_ids(&a.id, &b.id));
}
