//! Integration tests parsing real-world configuration files.
//!
//! These serve as smoke tests ensuring the parser handles common patterns
//! found in application configs, Maven POMs, Android manifests and
//! log4j/logback setups, and that each survives a dump and re-parse.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use txml::{Document, NodeKind};

fn parse_and_roundtrip(input: &str) -> Document {
    let doc = Document::parse_str(input).unwrap_or_else(|e| panic!("parse failed: {e}"));
    let output = doc.dump().unwrap();
    let doc2 = Document::parse_str(output.as_str().unwrap())
        .unwrap_or_else(|e| panic!("roundtrip parse failed: {e}"));
    assert_eq!(
        doc.count_branches(),
        doc2.count_branches(),
        "branch count mismatch after roundtrip"
    );
    assert_eq!(doc.node_count(), doc2.node_count(), "node count mismatch");
    doc
}

// --- Application configs ---

#[test]
fn test_service_config() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<config version="3">
  <!-- listeners -->
  <servers>
    <server name="primary">
      <host>10.0.0.1</host>
      <port>8080</port>
    </server>
    <server name="backup">
      <host>10.0.0.2</host>
      <port>8081</port>
    </server>
  </servers>
  <logging level="debug"/>
</config>"#;

    let doc = parse_and_roundtrip(xml);
    let root = doc.root().unwrap();
    assert_eq!(doc.name(root), "config");
    assert_eq!(doc.attribute(root, "version"), Some("3"));
    assert_eq!(doc.kind(doc.child_at(root, 1).unwrap()), NodeKind::Comment);

    let port = doc.get_node("/config/servers/server[@name='backup']/port").unwrap();
    assert_eq!(doc.value(port), "8081");
    assert_eq!(doc.path(port), "config/servers/server/port");

    let host = doc.get_node("/config/servers/server[2]/host").unwrap();
    assert_eq!(doc.value(host), "10.0.0.2");

    let logging = doc.get_node("/config/logging").unwrap();
    assert_eq!(doc.attribute(logging, "level"), Some("debug"));
    assert_eq!(doc.count_children(logging), 0);
}

#[test]
fn test_maven_pom() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.example</groupId>
  <artifactId>my-app</artifactId>
  <version>1.0-SNAPSHOT</version>
  <dependencies>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.13.2</version>
      <scope>test</scope>
    </dependency>
  </dependencies>
</project>"#;

    let doc = parse_and_roundtrip(xml);
    let version = doc.get_node("/project/version").unwrap();
    assert_eq!(doc.value(version), "1.0-SNAPSHOT");
    let scope = doc
        .get_node("/project/dependencies/dependency/scope")
        .unwrap();
    assert_eq!(doc.value(scope), "test");
}

#[test]
fn test_android_manifest() {
    let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<manifest package="com.example.app">
  <uses-permission name="android.permission.INTERNET"/>
  <application label="@string/app_name" icon="@mipmap/ic_launcher">
    <activity name=".MainActivity" exported="true">
      <intent-filter>
        <action name="android.intent.action.MAIN"/>
        <category name="android.intent.category.LAUNCHER"/>
      </intent-filter>
    </activity>
  </application>
</manifest>"#;

    let doc = parse_and_roundtrip(xml);
    assert_eq!(doc.source_encoding, "utf-8");
    let activity = doc.get_node("/manifest/application/activity").unwrap();
    assert_eq!(doc.attribute(activity, "exported"), Some("true"));
    let category = doc
        .get_node("/manifest/application/activity/intent-filter/category")
        .unwrap();
    assert_eq!(
        doc.attribute(category, "name"),
        Some("android.intent.category.LAUNCHER")
    );
}

#[test]
fn test_logback_with_cdata_and_entities() {
    let xml = r#"<configuration>
  <appender name="STDOUT">
    <encoder>
      <pattern><![CDATA[%d{HH:mm:ss} [%thread] %-5level %logger - %msg%n]]></pattern>
    </encoder>
  </appender>
  <logger name="com.example" additivity="false">a &lt; b &amp;&amp; c &gt; d</logger>
</configuration>"#;

    let doc = parse_and_roundtrip(xml);
    let pattern = doc
        .get_node("/configuration/appender/encoder/pattern")
        .unwrap();
    let cdata = doc.child_at(pattern, 1).unwrap();
    assert_eq!(doc.kind(cdata), NodeKind::CData);
    assert_eq!(
        doc.value(cdata),
        "%d{HH:mm:ss} [%thread] %-5level %logger - %msg%n"
    );

    let logger = doc.get_node("/configuration/logger").unwrap();
    assert_eq!(doc.value(logger), "a < b && c > d");
}

#[test]
fn test_doctype_is_skipped() {
    let xml = r#"<?xml version="1.0"?>
<!DOCTYPE properties SYSTEM "http://java.sun.com/dtd/properties.dtd" [
  <!ENTITY vendor "Example">
]>
<properties>
  <entry key="timeout">30</entry>
</properties>"#;

    let doc = parse_and_roundtrip(xml);
    assert_eq!(doc.count_branches(), 1);
    let entry = doc.get_node("/properties/entry[@key='timeout']").unwrap();
    assert_eq!(doc.value(entry), "30");
}

#[test]
fn test_deeply_nested() {
    let mut xml = String::new();
    for i in 0..100 {
        xml.push_str(&format!("<level{i}>"));
    }
    xml.push_str("bottom");
    for i in (0..100).rev() {
        xml.push_str(&format!("</level{i}>"));
    }

    let doc = parse_and_roundtrip(&xml);
    let path: String = (0..100).map(|i| format!("/level{i}")).collect();
    let bottom = doc.get_node(&path).unwrap();
    assert_eq!(doc.value(bottom), "bottom");
    assert_eq!(doc.path(bottom), &path[1..]);
    assert_eq!(doc.ancestors(bottom).count(), 100);
}

#[test]
fn test_many_siblings() {
    let mut xml = String::from("<list>");
    for i in 0..500 {
        xml.push_str(&format!("<item n=\"{i}\">{i}</item>"));
    }
    xml.push_str("</list>");

    let doc = parse_and_roundtrip(&xml);
    let list = doc.root().unwrap();
    assert_eq!(doc.count_children(list), 500);
    let item = doc.get_node("/list/item[@n='321']").unwrap();
    assert_eq!(doc.value(item), "321");
    assert_eq!(doc.get_node("/list/item[500]"), doc.child_at(list, 500));
}
