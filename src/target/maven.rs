//! Maven target
//!
//! Every block is placed inside `<project>` in `pom.xml` and uses XML comments
//! for markers. Documentation links become `<link>` entries of the
//! `maven-javadoc-plugin` configuration, which javadoc turns into `-link`
//! options.
//!
//! Every block is a self-contained run of elements, so it stays valid wherever
//! it is inserted under `<project>`.

use std::path::PathBuf;

use super::{
    escape_xml, ArtifactKind, CommentStyle, Placement, ResolvedDependency, Target,
};
use crate::descriptor::Descriptor;

pub const MANIFEST: &str = "pom.xml";

/// Apache Maven
#[derive(Debug, Clone, Copy, Default)]
pub struct Maven;

impl Target for Maven {
    fn name(&self) -> &'static str {
        "maven"
    }

    fn comment_style(&self) -> CommentStyle {
        CommentStyle::XML
    }

    fn placement(&self, _kind: ArtifactKind) -> Placement {
        Placement {
            path: PathBuf::from(MANIFEST),
            anchor: Some("</project>"),
            indent: "\t",
        }
    }

    fn skeleton(&self, _kind: ArtifactKind, descriptor: &Descriptor) -> String {
        let identity = descriptor.identity();
        format!(
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                "<project xmlns=\"http://maven.apache.org/POM/4.0.0\" ",
                "xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" ",
                "xsi:schemaLocation=\"http://maven.apache.org/POM/4.0.0 ",
                "https://maven.apache.org/xsd/maven-4.0.0.xsd\">\n",
                "\t<modelVersion>4.0.0</modelVersion>\n",
                "\t<groupId>{}</groupId>\n",
                "\t<artifactId>{}</artifactId>\n",
                "\t<version>0.1.0-SNAPSHOT</version>\n",
                "</project>\n",
            ),
            escape_xml(identity.group()),
            escape_xml(&identity.repository),
        )
    }

    fn render_identity(&self, descriptor: &Descriptor) -> String {
        let identity = descriptor.identity();
        let toggles = descriptor.toggles();
        let mut out = String::new();

        out.push_str(&format!("<name>{}</name>\n", escape_xml(&identity.name)));
        if !identity.description.is_empty() {
            out.push_str(&format!(
                "<description>{}</description>\n",
                escape_xml(&identity.description)
            ));
        }
        if let Some(homepage) = &identity.homepage {
            out.push_str(&format!("<url>{}</url>\n", escape_xml(homepage)));
        }
        out.push_str(&format!(
            "<inceptionYear>{}</inceptionYear>\n",
            identity.inception_year
        ));
        out.push_str("<properties>\n");
        out.push_str("\t<project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>\n");
        out.push_str(&format!(
            "\t<maven.compiler.release>{}</maven.compiler.release>\n",
            toggles.jdk_version
        ));
        out.push_str(&format!(
            "\t<project.lifecycle>{}</project.lifecycle>\n",
            descriptor.lifecycle().as_str()
        ));
        if !toggles.has_javadoc {
            out.push_str("\t<maven.javadoc.skip>true</maven.javadoc.skip>\n");
        }
        out.push_str("</properties>\n");
        out
    }

    fn render_dependencies(&self, dependencies: &[ResolvedDependency]) -> String {
        let mut out = String::from("<dependencies>\n");
        for dependency in dependencies {
            let coordinate = &dependency.coordinate;
            out.push_str("\t<dependency>\n");
            out.push_str(&format!(
                "\t\t<groupId>{}</groupId>\n",
                escape_xml(&coordinate.group)
            ));
            out.push_str(&format!(
                "\t\t<artifactId>{}</artifactId>\n",
                escape_xml(&coordinate.artifact)
            ));
            out.push_str(&format!(
                "\t\t<version>{}</version>\n",
                escape_xml(&coordinate.version)
            ));
            if !dependency.scope.is_default() {
                out.push_str(&format!("\t\t<scope>{}</scope>\n", dependency.scope.as_str()));
            }
            if !dependency.exclusions.is_empty() {
                out.push_str("\t\t<exclusions>\n");
                for exclusion in &dependency.exclusions {
                    out.push_str("\t\t\t<exclusion>\n");
                    out.push_str(&format!(
                        "\t\t\t\t<groupId>{}</groupId>\n",
                        escape_xml(&exclusion.group)
                    ));
                    out.push_str(&format!(
                        "\t\t\t\t<artifactId>{}</artifactId>\n",
                        escape_xml(&exclusion.artifact)
                    ));
                    out.push_str("\t\t\t</exclusion>\n");
                }
                out.push_str("\t\t</exclusions>\n");
            }
            out.push_str("\t</dependency>\n");
        }
        out.push_str("</dependencies>\n");
        out
    }

    fn render_doc_links(&self, links: &[&str]) -> String {
        let mut out = String::from("<build>\n\t<plugins>\n\t\t<plugin>\n");
        out.push_str("\t\t\t<groupId>org.apache.maven.plugins</groupId>\n");
        out.push_str("\t\t\t<artifactId>maven-javadoc-plugin</artifactId>\n");
        out.push_str("\t\t\t<configuration>\n");
        out.push_str("\t\t\t\t<links>\n");
        for link in links {
            out.push_str(&format!("\t\t\t\t\t<link>{}</link>\n", escape_xml(link)));
        }
        out.push_str("\t\t\t\t</links>\n");
        out.push_str("\t\t\t</configuration>\n");
        out.push_str("\t\t</plugin>\n\t</plugins>\n</build>\n");
        out
    }
}
