//! Stale host-block removal as an explicit line-by-line state machine.
//!
//! Host blocks are delimited purely by indentation: a `Host` declaration
//! line followed by indented option lines, ended by the first non-indented
//! line or end of input. The scrub is a single forward pass with no
//! lookahead.

/// State of the scrub pass between lines.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScrubState {
    /// Lines are kept verbatim.
    Copying,
    /// Inside a stale block: indented lines are dropped.
    Skipping,
}

/// Returns `true` when `line` declares a host block for exactly `host`.
///
/// The first token must be `Host` and a later token must equal the name
/// exactly, so synchronising `foo` never claims `foobar`'s block.
#[must_use]
pub fn is_host_declaration(line: &str, host: &str) -> bool {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("Host") {
        return false;
    }
    tokens.any(|token| token == host)
}

/// Advances the scrub by one line, returning the next state and whether the
/// line is kept.
///
/// A matching host declaration always enters [`ScrubState::Skipping`], even
/// when a previous block is still being skipped. A blank line does not start
/// with whitespace, so it ends the block and is kept.
#[must_use]
pub fn scrub_step(state: ScrubState, line: &str, host: &str) -> (ScrubState, bool) {
    if is_host_declaration(line, host) {
        return (ScrubState::Skipping, false);
    }
    if matches!(state, ScrubState::Skipping) && line.starts_with([' ', '\t']) {
        return (ScrubState::Skipping, false);
    }
    (ScrubState::Copying, true)
}

/// Removes every host block for `host`, keeping all other lines in order.
#[must_use]
pub fn strip_host_block(content: &str, host: &str) -> String {
    let mut state = ScrubState::Copying;
    let mut kept = Vec::new();
    for line in content.lines() {
        let (next, keep) = scrub_step(state, line, host);
        state = next;
        if keep {
            kept.push(line);
        }
    }
    kept.join("\n")
}

/// Renders the fresh block appended on every synchronisation pass.
///
/// The option set and order are fixed for compatibility with existing
/// configs.
#[must_use]
pub fn host_block(host: &str, address: &str) -> String {
    format!(
        "Host {host}\n  HostName {address}\n  ForwardAgent yes\n  AddKeysToAgent yes\n  CheckHostIP no\n"
    )
}

/// Produces the rewritten config content: stale blocks for `host` removed,
/// one fresh block appended after a single blank-line separator.
#[must_use]
pub fn rewrite(content: &str, host: &str, address: &str) -> String {
    let retained = strip_host_block(content, host);
    let trimmed = retained.trim_end();
    if trimmed.is_empty() {
        host_block(host, address)
    } else {
        format!("{trimmed}\n\n{}", host_block(host, address))
    }
}
