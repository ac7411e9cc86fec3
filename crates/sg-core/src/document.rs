//! Control-panel configuration documents
//!
//! A document describes the pages of a control panel and the buttons on
//! them. Each button names the page it belongs to through `pageId`.
//! Fields the gateway does not interpret (labels, colors, SSH settings)
//! are carried through untouched.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A control-panel document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelDocument {
    pub app_name: String,
    pub version: String,
    pub pages: Vec<Page>,
    pub buttons: Vec<Button>,
}

/// A page of buttons
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    #[serde(rename = "pageId")]
    pub page_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A button bound to a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Button {
    pub id: String,
    #[serde(rename = "pageId")]
    pub page_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A structural problem in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    NoPages,
    NoButtons,
    DanglingPageRef { button_id: String, page_id: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NoPages => write!(f, "At least one page is required"),
            Violation::NoButtons => write!(f, "At least one button is required"),
            Violation::DanglingPageRef { button_id, page_id } => write!(
                f,
                "Button {} references non-existent pageId: {}",
                button_id, page_id
            ),
        }
    }
}

impl PanelDocument {
    /// Collect every structural violation, in document order
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        if self.pages.is_empty() {
            violations.push(Violation::NoPages);
        }
        if self.buttons.is_empty() {
            violations.push(Violation::NoButtons);
        }

        let page_ids: HashSet<&str> = self.pages.iter().map(|p| p.page_id.as_str()).collect();
        for button in &self.buttons {
            if !page_ids.contains(button.page_id.as_str()) {
                violations.push(Violation::DanglingPageRef {
                    button_id: button.id.clone(),
                    page_id: button.page_id.clone(),
                });
            }
        }

        violations
    }
}
