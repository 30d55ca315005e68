//! Gradle target (Kotlin DSL)
//!
//! All blocks live at the top level of `build.gradle.kts` and use `//` line
//! comments for markers. New blocks are appended at the end of the file.

use std::path::PathBuf;

use super::{ArtifactKind, CommentStyle, Placement, ResolvedDependency, Target};
use crate::coordinate::Scope;
use crate::descriptor::Descriptor;

pub const BUILD_SCRIPT: &str = "build.gradle.kts";

/// Gradle with the Kotlin DSL
#[derive(Debug, Clone, Copy, Default)]
pub struct Gradle;

fn configuration(scope: Scope) -> &'static str {
    match scope {
        Scope::Compile => "implementation",
        Scope::Provided => "compileOnly",
        Scope::Runtime => "runtimeOnly",
        Scope::Test => "testImplementation",
    }
}

/// Quote a Kotlin string literal.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '$' => quoted.push_str("\\$"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

impl Target for Gradle {
    fn name(&self) -> &'static str {
        "gradle"
    }

    fn comment_style(&self) -> CommentStyle {
        CommentStyle::LINE
    }

    fn placement(&self, _kind: ArtifactKind) -> Placement {
        Placement {
            path: PathBuf::from(BUILD_SCRIPT),
            anchor: None,
            indent: "",
        }
    }

    fn skeleton(&self, _kind: ArtifactKind, descriptor: &Descriptor) -> String {
        format!(
            concat!(
                "plugins {{\n",
                "    `java-library`\n",
                "}}\n",
                "\n",
                "group = {}\n",
                "version = \"0.1.0-SNAPSHOT\"\n",
                "\n",
                "repositories {{\n",
                "    mavenCentral()\n",
                "}}\n",
            ),
            quote(descriptor.identity().group())
        )
    }

    fn render_identity(&self, descriptor: &Descriptor) -> String {
        let identity = descriptor.identity();
        let toggles = descriptor.toggles();
        let mut out = String::new();

        out.push_str(&format!("description = {}\n", quote(&identity.description)));
        out.push_str(&format!("extra[\"displayName\"] = {}\n", quote(&identity.name)));
        out.push_str(&format!(
            "extra[\"inceptionYear\"] = {}\n",
            identity.inception_year
        ));
        out.push_str(&format!(
            "extra[\"lifecycle\"] = {}\n",
            quote(descriptor.lifecycle().as_str())
        ));
        if let Some(homepage) = &identity.homepage {
            out.push_str(&format!("extra[\"url\"] = {}\n", quote(homepage)));
        }
        out.push('\n');
        out.push_str("java {\n");
        out.push_str("    toolchain {\n");
        out.push_str(&format!(
            "        languageVersion.set(JavaLanguageVersion.of({}))\n",
            toggles.jdk_version
        ));
        out.push_str("    }\n");
        out.push_str("}\n");
        if !toggles.has_javadoc {
            out.push('\n');
            out.push_str("tasks.named<Javadoc>(\"javadoc\") {\n");
            out.push_str("    enabled = false\n");
            out.push_str("}\n");
        }
        out
    }

    fn render_dependencies(&self, dependencies: &[ResolvedDependency]) -> String {
        let mut out = String::from("dependencies {\n");
        for dependency in dependencies {
            let call = format!(
                "{}({})",
                configuration(dependency.scope),
                quote(&dependency.coordinate.to_string())
            );
            if dependency.exclusions.is_empty() {
                out.push_str(&format!("    {call}\n"));
            } else {
                out.push_str(&format!("    {call} {{\n"));
                for exclusion in &dependency.exclusions {
                    out.push_str(&format!(
                        "        exclude(group = {}, module = {})\n",
                        quote(&exclusion.group),
                        quote(&exclusion.artifact)
                    ));
                }
                out.push_str("    }\n");
            }
        }
        out.push_str("}\n");
        out
    }

    fn render_doc_links(&self, links: &[&str]) -> String {
        let mut out = String::from("tasks.named<Javadoc>(\"javadoc\") {\n");
        if !links.is_empty() {
            out.push_str("    (options as StandardJavadocDocletOptions).links(\n");
            for link in links {
                out.push_str(&format!("        {},\n", quote(link)));
            }
            out.push_str("    )\n");
        }
        out.push_str("}\n");
        out
    }
}
