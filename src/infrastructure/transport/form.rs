//! Browser form-redirect rendering

use serde::Serialize;

use crate::domain::CanonicalParameterSet;

/// A signed payment form: where to post it and what to post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentForm {
    pub action: String,
    pub fields: CanonicalParameterSet,
}

impl PaymentForm {
    pub fn new(action: impl Into<String>, fields: CanonicalParameterSet) -> Self {
        Self {
            action: action.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name)
    }

    /// Self-submitting HTML page posting every field, empty ones included, as hidden inputs
    pub fn render_html(&self) -> String {
        let hidden: String = self
            .fields
            .iter()
            .map(|(name, value)| {
                format!(
                    "<input type=\"hidden\" name=\"{}\" value=\"{}\" />\n",
                    html_escape::encode_quoted_attribute(name),
                    html_escape::encode_quoted_attribute(value)
                )
            })
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html>
    <head>
        <meta http-equiv="Content-Type" content="text/html; charset=UTF-8" />
        <title>Redirecting...</title>
    </head>
    <body onload="document.forms[0].submit();">
        <form action="{}" method="post">
{}            <input style="display: none;" type="submit" value="Continue" />
        </form>
    </body>
</html>"#,
            html_escape::encode_quoted_attribute(&self.action),
            hidden
        )
    }
}
