use std::fmt::Write as _;
use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};
use arboard::Clipboard;
use rpassword::prompt_password;
use zeroize::Zeroizing;

use clipvault::navigation::path_to_node;
use clipvault::{AppData, Node, SearchHit};

const MIN_PASSPHRASE_LEN: usize = 8;

pub fn validate_master_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.is_empty() {
        return Err(anyhow!("Password is required"));
    }
    if passphrase.chars().count() < MIN_PASSPHRASE_LEN {
        return Err(anyhow!(
            "Password must be at least {MIN_PASSPHRASE_LEN} characters"
        ));
    }
    Ok(())
}

pub fn prompt_master_password() -> Result<Zeroizing<String>> {
    Ok(Zeroizing::new(prompt_password("Master password: ")?))
}

pub fn prompt_new_master_password() -> Result<Zeroizing<String>> {
    loop {
        let p1 = Zeroizing::new(prompt_password("Set a master password: ")?);
        let p2 = Zeroizing::new(prompt_password("Confirm master password: ")?);
        if *p1 != *p2 {
            eprintln!("Passwords do not match, try again.");
            continue;
        }
        if let Err(e) = validate_master_passphrase(&p1) {
            eprintln!("{e}");
            continue;
        }
        return Ok(p1);
    }
}

/// Places `text` on the clipboard and, if `clear_after` is non-zero, blocks
/// until it is wiped again.
pub fn copy_to_clipboard(text: &str, clear_after: Duration) -> Result<()> {
    let mut clipboard = Clipboard::new().map_err(|e| anyhow!("Clipboard unavailable: {e}"))?;
    clipboard
        .set_text(text.to_owned())
        .map_err(|e| anyhow!("Failed to set clipboard: {e}"))?;
    if !clear_after.is_zero() {
        thread::sleep(clear_after);
        let _ = clipboard.set_text(String::new());
    }
    Ok(())
}

fn describe(node: &Node) -> String {
    match node {
        Node::Group(group) => format!("[+] {}  ({})", group.name, group.id),
        Node::Item(item) if item.description.is_empty() => {
            format!("[-] {}  ({})", item.name, item.id)
        }
        Node::Item(item) => format!("[-] {}: {}  ({})", item.name, item.description, item.id),
    }
}

pub fn render_tree(data: &AppData) -> String {
    fn walk(nodes: &[Node], depth: usize, out: &mut String) {
        for node in nodes {
            let _ = writeln!(out, "{}{}", "  ".repeat(depth), describe(node));
            if let Node::Group(group) = node {
                walk(&group.children, depth + 1, out);
            }
        }
    }
    let mut out = String::new();
    if data.groups.is_empty() {
        out.push_str("(empty)\n");
    }
    walk(&data.groups, 0, &mut out);
    out
}

pub fn render_listing(breadcrumb: &[String], children: &[Node]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "/{}", breadcrumb.join("/"));
    if children.is_empty() {
        out.push_str("  (empty)\n");
    }
    for (index, node) in children.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", index + 1, describe(node));
    }
    out
}

pub fn render_hits(hits: &[SearchHit<'_>]) -> String {
    let mut out = String::new();
    for hit in hits {
        let mut crumbs = hit.path.clone();
        crumbs.push(hit.node.name().to_owned());
        let _ = writeln!(out, "{}  ({})", crumbs.join(" > "), hit.node.id());
    }
    out
}

pub fn render_path(data: &AppData, id: &str) -> Option<String> {
    path_to_node(&data.groups, id).map(|names| names.join(" > "))
}
