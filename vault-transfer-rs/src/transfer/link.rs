//! `obsidian://` links into the other vault.

use crate::config::TransferSettings;
use crate::error::Result;
use crate::host::Editor;
use crate::transfer::path::clean_root;
use crate::types::NoteRef;

/// Characters `encodeURI` leaves alone besides ASCII alphanumerics.
const URI_UNESCAPED: &[u8] = b";,/?:@&=+$-_.!~*'()#";

/// Percent-encode a string the way JavaScript's `encodeURI` does.
pub fn encode_uri(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for byte in s.bytes() {
        if byte.is_ascii_alphanumeric() || URI_UNESCAPED.contains(&byte) {
            result.push(byte as char);
        } else {
            result.push_str(&format!("%{:02X}", byte));
        }
    }
    result
}

/// The other vault's name: the last segment of its root path.
pub fn vault_name(target_root: &str) -> String {
    let root = clean_root(target_root);
    root.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Build `[name](obsidian://vault/<vault>/<name>)`.
pub fn create_vault_file_link(display_name: &str, target_root: &str) -> String {
    format!(
        "[{}](obsidian://vault/{}/{})",
        display_name,
        encode_uri(&vault_name(target_root)),
        encode_uri(display_name)
    )
}

/// The link line that replaces a note once it lives in the other vault.
pub fn link_for_note(note: &NoteRef, settings: &TransferSettings) -> Result<String> {
    settings.validate()?;
    Ok(create_vault_file_link(&note.basename, &settings.target_root))
}

/// Insert a link to the note's counterpart in the other vault at the cursor.
///
/// Nothing is transferred.
pub fn insert_link_to_other_vault(
    editor: &mut dyn Editor,
    note: &NoteRef,
    settings: &TransferSettings,
) -> Result<String> {
    let link = link_for_note(note, settings)?;
    editor.replace_selection(&link);
    Ok(link)
}
