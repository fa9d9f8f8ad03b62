//! Server-issued page and dialog descriptors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PageDecodeError, SwapError};

/// Component props as sent by the server.
pub type Props = serde_json::Map<String, Value>;

/// One navigation response as it arrives from the server, dialog included.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Props>,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialog: Option<DialogDescriptor>,
    #[serde(default, skip_serializing_if = "Props::is_empty")]
    pub remembered_state: Props,
    #[serde(flatten)]
    pub extra: Props,
}

impl Page {
    pub fn new(component: impl Into<String>, props: Props) -> Self {
        Self {
            component: component.into(),
            props: Some(props),
            url: String::new(),
            version: None,
            dialog: None,
            remembered_state: Props::new(),
            extra: Props::new(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, PageDecodeError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_dialog(mut self, dialog: DialogDescriptor) -> Self {
        self.dialog = Some(dialog);
        self
    }

    /// Separates the dialog sub-object from the page payload.
    ///
    /// A page without props is a protocol desync and is rejected rather than
    /// defaulted.
    pub fn split(self) -> Result<(PageData, Option<DialogDescriptor>), SwapError> {
        let Page {
            component,
            props,
            url,
            version,
            dialog,
            remembered_state,
            extra,
        } = self;
        let props = props.ok_or_else(|| SwapError::MissingPageProps {
            component: component.clone(),
        })?;
        let data = PageData {
            component,
            props,
            url,
            version,
            remembered_state,
            extra,
        };
        Ok((data, dialog))
    }
}

/// The page payload held in page state: a [`Page`] minus its dialog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub component: String,
    pub props: Props,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Props::is_empty")]
    pub remembered_state: Props,
    #[serde(flatten)]
    pub extra: Props,
}

/// Secondary overlay view attached to a page.
///
/// `open` and `appear` are computed on the client; whatever the server sends
/// for them is overwritten when the dialog is swapped in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogDescriptor {
    pub component: String,
    #[serde(default)]
    pub props: Props,
    #[serde(default)]
    pub eager: bool,
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub appear: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Props,
}

impl DialogDescriptor {
    pub fn new(component: impl Into<String>, props: Props) -> Self {
        Self {
            component: component.into(),
            props,
            eager: false,
            open: false,
            appear: false,
            url: None,
            extra: Props::new(),
        }
    }

    pub fn eager(mut self, eager: bool) -> Self {
        self.eager = eager;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_page_with_embedded_dialog() {
        let page = Page::from_json(
            r#"{
                "component": "Users/Index",
                "props": {"users": [1, 2]},
                "url": "/users/2/edit",
                "version": "abc",
                "dialog": {"component": "Users/Edit", "props": {"id": 2}, "eager": true, "baseUrl": "/users"}
            }"#,
        )
        .expect("valid page json");

        let (data, dialog) = page.split().expect("page has props");
        assert_eq!(data.component, "Users/Index");
        assert_eq!(data.props["users"], json!([1, 2]));
        assert_eq!(data.version.as_deref(), Some("abc"));

        let dialog = dialog.expect("dialog present");
        assert_eq!(dialog.component, "Users/Edit");
        assert!(dialog.eager);
        assert!(!dialog.open);
        assert_eq!(dialog.extra["baseUrl"], json!("/users"));
    }

    #[test]
    fn split_rejects_missing_props() {
        let page = Page::from_json(r#"{"component": "Broken", "url": "/"}"#).expect("decodes");
        assert_eq!(
            page.split().unwrap_err(),
            SwapError::MissingPageProps {
                component: "Broken".into()
            }
        );
    }

    #[test]
    fn null_props_count_as_missing() {
        let page = Page::from_json(r#"{"component": "Broken", "props": null}"#).expect("decodes");
        assert!(matches!(
            page.split(),
            Err(SwapError::MissingPageProps { .. })
        ));
    }

    #[test]
    fn unknown_page_fields_survive_the_split() {
        let page = Page::from_json(r#"{"component": "A", "props": {}, "encryptHistory": true}"#)
            .expect("decodes");
        let (data, dialog) = page.split().expect("has props");
        assert!(dialog.is_none());
        assert_eq!(data.extra["encryptHistory"], json!(true));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(Page::from_json("{not json").is_err());
    }
}
