// ── API-to-domain type conversions ──
//
// Bridges raw `featly_api` wire types into canonical `featly_core::model`
// domain types, and domain inputs back into request shapes.

use featly_api::types::{FeatureItemForm, FeatureItemResponse, ListQuery};

use crate::filters::FilterDescriptor;
use crate::model::{Item, ItemForm, ItemId, ItemStatus, PageMeta};

// ── Items ──────────────────────────────────────────────────────────

/// Unknown status strings are dropped rather than failing the whole item.
fn parse_status(raw: Option<&str>) -> Option<ItemStatus> {
    raw.and_then(|s| s.parse().ok())
}

impl From<FeatureItemResponse> for Item {
    fn from(r: FeatureItemResponse) -> Self {
        let status = parse_status(r.status.as_deref());
        Self {
            id: ItemId::from(r.id),
            title: r.title,
            description: r.description,
            created_at: r.created_at,
            updated_at: r.updated_at,
            status,
        }
    }
}

impl From<&ItemForm> for FeatureItemForm {
    fn from(form: &ItemForm) -> Self {
        Self {
            title: form.title.clone(),
            description: form.description.clone(),
        }
    }
}

// ── Pagination ─────────────────────────────────────────────────────

impl From<featly_api::PageMeta> for PageMeta {
    fn from(m: featly_api::PageMeta) -> Self {
        Self {
            total: m.total,
            page: m.page,
            per_page: m.per_page,
            last_page: m.last_page,
        }
    }
}

impl From<&FilterDescriptor> for ListQuery {
    fn from(f: &FilterDescriptor) -> Self {
        Self {
            search: f.search.clone(),
            sort_by: f.sort_by.as_ref().to_owned(),
            sort_direction: f.sort_direction.as_ref().to_owned(),
            page: f.page,
            per_page: f.per_page,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::filters::{SortDirection, SortKey};

    fn response(status: Option<&str>) -> FeatureItemResponse {
        FeatureItemResponse {
            id: "f-1".into(),
            title: "Alpha".into(),
            description: "first".into(),
            created_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap(),
            status: status.map(str::to_owned),
        }
    }

    #[test]
    fn item_keeps_known_status() {
        let item = Item::from(response(Some("Published")));
        assert_eq!(item.id.as_str(), "f-1");
        assert_eq!(item.status, Some(ItemStatus::Published));
    }

    #[test]
    fn unknown_status_becomes_none() {
        assert_eq!(Item::from(response(Some("retired"))).status, None);
        assert_eq!(Item::from(response(None)).status, None);
    }

    #[test]
    fn descriptor_renders_wire_values() {
        let descriptor = FilterDescriptor {
            search: "alp".into(),
            sort_by: SortKey::UpdatedAt,
            sort_direction: SortDirection::Asc,
            page: 2,
            per_page: 25,
        };
        let query = ListQuery::from(&descriptor);
        assert_eq!(
            query.to_params(),
            vec![
                ("search", "alp".to_owned()),
                ("sort_by", "updatedAt".to_owned()),
                ("sort_direction", "asc".to_owned()),
                ("page", "2".to_owned()),
                ("per_page", "25".to_owned()),
            ]
        );
    }
}
