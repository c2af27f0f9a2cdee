/// JSON-quote `text` for use in error messages.
pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

/// Protobuf packages whose messages never get a generated schema.
pub const WELL_KNOWN_PACKAGE: &str = "google.protobuf";

/// Path of the module generated for `proto_path`.
pub fn generated_file_name(proto_path: &str) -> String {
    let stem = proto_path.strip_suffix(".proto").unwrap_or(proto_path);
    format!("{}.valibot.ts", stem)
}

/// Module specifier used by `from_proto`'s module to import the module
/// generated for `to_proto`. Always starts with `.`.
pub fn import_specifier(from_proto: &str, to_proto: &str) -> String {
    let target = generated_file_name(to_proto);
    let target = target.strip_suffix(".ts").unwrap_or(&target);

    let from_dir: Vec<&str> = from_proto.split('/').collect();
    let from_dir = &from_dir[..from_dir.len() - 1];
    let target: Vec<&str> = target.split('/').collect();
    let (target_dir, target_name) = target.split_at(target.len() - 1);

    let common = from_dir
        .iter()
        .zip(target_dir)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; from_dir.len() - common];
    parts.extend_from_slice(&target_dir[common..]);
    parts.extend_from_slice(target_name);

    let rel = parts.join("/");
    if rel.starts_with("..") {
        rel
    } else {
        format!("./{}", rel)
    }
}
