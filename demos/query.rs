//! Looking nodes up by path and editing them in place.
//!
//! Run with: `cargo run --example query`
#![allow(clippy::expect_used)]

use txml::Document;

fn main() {
    let xml = r#"<config>
  <servers>
    <server name="primary"><host>10.0.0.1</host><port>8080</port></server>
    <server name="backup"><host>10.0.0.2</host><port>8081</port></server>
  </servers>
</config>"#;

    let mut doc = Document::parse_str(xml).expect("failed to parse XML");

    for path in [
        "/config/servers/server/host",
        "/config/servers/server[2]/host",
        "/config/servers/server[@name='backup']/port",
        "/config/servers/server[3]/host",
    ] {
        match doc.get_node(path) {
            Some(id) => println!("{path} -> {}", doc.value(id)),
            None => println!("{path} -> (not found)"),
        }
    }

    let port = doc
        .get_node("/config/servers/server[@name='primary']/port")
        .expect("primary port");
    doc.set_value(port, "9090");

    let backup = doc
        .get_node("/config/servers/server[@name='backup']")
        .expect("backup server");
    doc.add_attribute(backup, "enabled", Some("false"))
        .expect("add attribute");

    doc.remove_node_at("/config/servers/server[@name='backup']/host")
        .expect("remove host");

    let servers = doc.get_node("/config/servers").expect("servers");
    print!("{}", doc.dump_branch(servers, 0));
}
