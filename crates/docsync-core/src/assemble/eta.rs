//! Template marker detection

use std::sync::LazyLock;

use regex::Regex;

/// `<%raw%> ... <%endraw%>` escape blocks, matched lazily across lines.
static RAW_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<%\s*raw\s*%>.*?<%\s*endraw\s*%>").unwrap());

/// Any `<% ... %>` tag, including `<%=`, `<%~` and `<%-` forms.
static TEMPLATE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<%.*?%>").unwrap());

/// True when `content` contains template markers outside raw blocks.
pub fn detect_eta(content: &str) -> bool {
    let stripped = RAW_BLOCK.replace_all(content, "");
    TEMPLATE_TAG.is_match(&stripped)
}
