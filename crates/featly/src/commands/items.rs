//! Item command handlers.

use chrono::{DateTime, Utc};
use tabled::Tabled;

use featly_core::{
    CollectionController, FilterPatch, Item, ItemForm, PageMeta, SortDirection, SortKey,
    Transport,
};

use crate::cli::{Direction, GlobalOpts, ItemsArgs, ItemsCommand, ListArgs, OutputFormat, SortField};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Flag mapping ────────────────────────────────────────────────────

impl From<SortField> for SortKey {
    fn from(f: SortField) -> Self {
        match f {
            SortField::CreatedAt => Self::CreatedAt,
            SortField::Title => Self::Title,
            SortField::UpdatedAt => Self::UpdatedAt,
        }
    }
}

impl From<Direction> for SortDirection {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Asc => Self::Asc,
            Direction::Desc => Self::Desc,
        }
    }
}

fn list_patch(args: ListArgs) -> FilterPatch {
    FilterPatch {
        search: args.search,
        sort_by: args.sort_by.map(Into::into),
        sort_direction: args.direction.map(Into::into),
        page: args.page,
        per_page: args.per_page,
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

impl From<&Item> for ItemRow {
    fn from(i: &Item) -> Self {
        Self {
            id: i.id.to_string(),
            title: i.title.clone(),
            status: i.status.map(|s| s.to_string()).unwrap_or_default(),
            created: timestamp(&i.created_at),
            updated: timestamp(&i.updated_at),
        }
    }
}

fn detail(i: &Item) -> String {
    [
        format!("ID:          {}", i.id),
        format!("Title:       {}", i.title),
        format!(
            "Status:      {}",
            i.status.map_or_else(|| "-".into(), |s| s.to_string())
        ),
        format!("Created:     {}", timestamp(&i.created_at)),
        format!("Updated:     {}", timestamp(&i.updated_at)),
        format!(
            "Description: {}",
            if i.description.is_empty() {
                "-"
            } else {
                i.description.as_str()
            }
        ),
    ]
    .join("\n")
}

fn footer(meta: &PageMeta) -> String {
    format!(
        "Page {} of {} ({} items total)",
        meta.page, meta.last_page, meta.total
    )
}

fn print_item(item: &Item, global: &GlobalOpts) -> Result<(), CliError> {
    let format = global.output.unwrap_or_default();
    let out = output::render_single(format, item, detail, |i| i.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle<S: Transport>(
    controller: &CollectionController<S>,
    args: ItemsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ItemsCommand::List(list) => {
            let page = controller.update_filters(list_patch(list)).await;
            util::require(page, controller.list_error())?;

            let format = global.output.unwrap_or_default();
            let items = controller.filtered_items();
            let mut out = output::render_list(
                format,
                &items,
                |i| ItemRow::from(i),
                |i| i.id.to_string(),
            )?;
            if format == OutputFormat::Table {
                if let Some(meta) = controller.page_meta() {
                    out.push('\n');
                    out.push_str(&footer(&meta));
                }
            }
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ItemsCommand::Get { id } => {
            let item = util::require(controller.load_item(id).await, controller.item_error())?;
            print_item(&item, global)
        }

        ItemsCommand::Create(form_args) => {
            let form = util::form_from_args(&form_args, None)?;
            let outcome =
                util::require(controller.create_item(&form).await, controller.save_error())?;
            match outcome.item() {
                Some(item) => print_item(item, global),
                None => Ok(()),
            }
        }

        ItemsCommand::Update { id, form } => {
            // Updates replace the item wholesale, so fields the user left
            // out come from the current server copy.
            let partial = form.from_file.is_none()
                && (form.title.is_none() || form.description.is_none());
            let base = if partial {
                let current =
                    util::require(controller.load_item(id.as_str()).await, controller.item_error())?;
                Some(ItemForm::new(
                    current.title.clone(),
                    current.description.clone(),
                ))
            } else {
                None
            };

            let form = util::form_from_args(&form, base.as_ref())?;
            let outcome = util::require(
                controller.update_item(id.as_str(), &form).await,
                controller.save_error(),
            )?;
            match outcome.item() {
                Some(item) => print_item(item, global),
                None => Ok(()),
            }
        }

        ItemsCommand::Delete { id } => {
            if !util::confirm("delete", &format!("Delete item '{id}'?"), global.yes)? {
                output::print_output("Aborted.", global.quiet);
                return Ok(());
            }
            util::require(
                controller.delete_item(id.as_str()).await,
                controller.save_error(),
            )?;
            output::print_output(&format!("Deleted item {id}"), global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use featly_core::{ItemId, ItemStatus};

    fn sample() -> Item {
        let at = Utc.with_ymd_and_hms(2023, 2, 1, 9, 30, 0).unwrap();
        Item {
            id: ItemId::from("f-2"),
            title: "Beta".into(),
            description: String::new(),
            created_at: at,
            updated_at: at,
            status: Some(ItemStatus::Draft),
        }
    }

    #[test]
    fn row_formats_timestamps_and_status() {
        let row = ItemRow::from(&sample());
        assert_eq!(row.created, "2023-02-01 09:30");
        assert_eq!(row.status, "draft");
    }

    #[test]
    fn detail_marks_empty_description() {
        assert!(detail(&sample()).contains("Description: -"));
    }

    #[test]
    fn list_flags_become_a_patch() {
        let patch = list_patch(ListArgs {
            search: Some("alp".into()),
            sort_by: Some(SortField::UpdatedAt),
            direction: None,
            page: Some(2),
            per_page: None,
        });
        assert_eq!(
            patch,
            FilterPatch::default()
                .search("alp")
                .sort_by(SortKey::UpdatedAt)
                .page(2)
        );
    }
}
