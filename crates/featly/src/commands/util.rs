//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use featly_core::{CoreError, ItemForm};

use crate::cli::FormArgs;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
/// Without a terminal to ask on, `--yes` is required.
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read an `ItemForm` from a JSON file for `--from-file`.
pub fn read_form_file(path: &Path) -> Result<ItemForm, CliError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Build a form from flags or `--from-file`. `base` fills fields the
/// flags leave out.
pub fn form_from_args(args: &FormArgs, base: Option<&ItemForm>) -> Result<ItemForm, CliError> {
    if let Some(ref path) = args.from_file {
        return read_form_file(path);
    }
    let title = args
        .title
        .clone()
        .or_else(|| base.map(|b| b.title.clone()))
        .ok_or_else(|| CliError::Validation {
            field: "title".into(),
            reason: "required (pass --title or --from-file)".into(),
        })?;
    let description = args
        .description
        .clone()
        .or_else(|| base.map(|b| b.description.clone()))
        .unwrap_or_default();
    Ok(ItemForm::new(title, description))
}

/// Unwrap an action's result, surfacing the resource's recorded failure
/// when there is none.
pub fn require<T>(value: Option<T>, error: Option<Arc<CoreError>>) -> Result<T, CliError> {
    match (value, error) {
        (Some(value), _) => Ok(value),
        (None, Some(err)) => Err(CliError::from(&*err)),
        (None, None) => Err(CliError::ApiError {
            code: "internal".into(),
            message: "request finished without a result".into(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    fn args(title: Option<&str>, description: Option<&str>) -> FormArgs {
        FormArgs {
            title: title.map(Into::into),
            description: description.map(Into::into),
            from_file: None,
        }
    }

    #[test]
    fn require_prefers_recorded_error() {
        let err = require::<()>(None, Some(Arc::new(CoreError::Timeout))).unwrap_err();
        assert!(matches!(err, CliError::Timeout));
        assert_eq!(require(Some(3), None).unwrap(), 3);
    }

    #[test]
    fn create_requires_title() {
        let err = form_from_args(&args(None, Some("d")), None).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "title"));
    }

    #[test]
    fn update_keeps_unspecified_fields() {
        let base = ItemForm::new("Alpha", "first");
        let form = form_from_args(&args(None, Some("changed")), Some(&base)).unwrap();
        assert_eq!(form, ItemForm::new("Alpha", "changed"));
    }

    #[test]
    fn reads_form_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "title": "From file" }}"#).unwrap();
        let form = form_from_args(
            &FormArgs {
                title: None,
                description: None,
                from_file: Some(file.path().to_path_buf()),
            },
            None,
        )
        .unwrap();
        assert_eq!(form, ItemForm::new("From file", ""));
    }
}
