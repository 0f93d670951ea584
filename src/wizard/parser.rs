//! Validating parse of the install wizard document
//!
//! Walks the `roxmltree` tree once and produces a [`ModuleDescriptor`].
//! Structural problems surface here, before any prompt is shown or any
//! file is copied.

use std::fmt::Write as _;

use roxmltree::{Document, Node, ParsingOptions};
use tracing::{debug, warn};

use crate::error::Result;
use crate::error::wizard::{malformed, missing_attribute};
use crate::wizard::descriptor::{
    CopyOp, Group, InstallStep, ModuleDescriptor, Pattern, PluginOption, SelectionMode,
};
use crate::wizard::flags::{FlagCondition, FlagExpression, Operator};

const UNNAMED: &str = "<no name>";

/// Decode raw document bytes into text
///
/// Handles the UTF-8 BOM and UTF-16 in either byte order (with a BOM, or
/// detected from the leading `<`). Anything else is read as UTF-8 with
/// invalid sequences replaced.
pub fn decode_document(bytes: &[u8]) -> String {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest).into_owned(),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        [b'<', 0x00, ..] => decode_utf16(bytes, u16::from_le_bytes),
        [0x00, b'<', ..] => decode_utf16(bytes, u16::from_be_bytes),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Decode and parse a wizard document
pub fn parse_bytes(bytes: &[u8]) -> Result<ModuleDescriptor> {
    parse_document(&decode_document(bytes))
}

fn load(text: &str) -> Result<Document<'_>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(text, options)
        .map_err(|e| malformed(format!("cannot parse XML: {e}")))
}

/// Parse wizard document text into a typed descriptor
pub fn parse_document(text: &str) -> Result<ModuleDescriptor> {
    let doc = load(text)?;
    let root = doc.root_element();

    let mut name = None;
    let mut steps_node = None;
    let mut required_files = Vec::new();
    let mut conditional_installs = Vec::new();

    for child in elements(root) {
        match child.tag_name().name() {
            "moduleName" => name = Some(text_content(child).trim().to_string()),
            "installSteps" => steps_node = Some(child),
            "requiredInstallFiles" => required_files = parse_copy_ops(child)?,
            "conditionalFileInstalls" => conditional_installs = parse_conditional(child)?,
            other => debug!(element = other, "Ignoring wizard section"),
        }
    }

    let name = name.ok_or_else(|| malformed("missing 'moduleName'"))?;
    let steps_node = steps_node.ok_or_else(|| malformed("missing 'installSteps'"))?;
    let steps = children_named(steps_node, "installStep")
        .map(parse_step)
        .collect::<Result<Vec<_>>>()?;

    debug!(
        module = %name,
        steps = steps.len(),
        required = required_files.len(),
        patterns = conditional_installs.len(),
        "Parsed install wizard"
    );

    Ok(ModuleDescriptor {
        name,
        required_files,
        steps,
        conditional_installs,
    })
}

fn parse_step(node: Node<'_, '_>) -> Result<InstallStep> {
    let name = node.attribute("name").unwrap_or(UNNAMED).to_string();
    let mut visibility = None;
    let mut groups = Vec::new();

    for child in elements(node) {
        match child.tag_name().name() {
            "visible" => {
                if visibility.is_some() {
                    return Err(malformed(format!(
                        "step '{name}' has more than one 'visible' section"
                    )));
                }
                visibility = Some(parse_visibility(child)?);
            }
            "optionalFileGroups" => {
                for group in children_named(child, "group") {
                    groups.push(parse_group(group)?);
                }
            }
            _ => {}
        }
    }

    Ok(InstallStep {
        name,
        visibility,
        groups,
    })
}

/// `visible` holds either bare `flagDependency` children (joined with AND)
/// or a single `dependencies` element carrying its own operator
fn parse_visibility(node: Node<'_, '_>) -> Result<FlagExpression> {
    let nested: Vec<_> = children_named(node, "dependencies").collect();
    let direct = flag_conditions(node)?;
    match nested.as_slice() {
        [] => Ok(FlagExpression::new(Operator::And, direct)),
        [deps] if direct.is_empty() => parse_dependencies(*deps),
        _ => Err(malformed("'visible' mixes several dependency sections")),
    }
}

fn parse_dependencies(node: Node<'_, '_>) -> Result<FlagExpression> {
    let raw = node.attribute("operator");
    let operator = Operator::from_attr(raw).ok_or_else(|| {
        malformed(format!(
            "unknown dependency operator '{}'",
            raw.unwrap_or_default()
        ))
    })?;
    Ok(FlagExpression::new(operator, flag_conditions(node)?))
}

fn flag_conditions(node: Node<'_, '_>) -> Result<Vec<FlagCondition>> {
    let mut conditions = Vec::new();
    for child in elements(node) {
        match child.tag_name().name() {
            "flagDependency" => {
                let flag = child
                    .attribute("flag")
                    .ok_or_else(|| missing_attribute("flagDependency", "flag"))?;
                conditions.push(FlagCondition::new(flag, child.attribute("value")));
            }
            "dependencies" => {}
            other => debug!(kind = other, "Ignoring non-flag dependency"),
        }
    }
    Ok(conditions)
}

fn parse_group(node: Node<'_, '_>) -> Result<Group> {
    let name = node.attribute("name").unwrap_or(UNNAMED).to_string();
    let kind = node
        .attribute("type")
        .ok_or_else(|| missing_attribute("group", "type"))?;
    let mode = SelectionMode::from_type(kind)
        .ok_or_else(|| malformed(format!("group '{name}' has unknown type '{kind}'")))?;

    let mut options = Vec::new();
    for plugins in children_named(node, "plugins") {
        for plugin in children_named(plugins, "plugin") {
            options.push(parse_option(plugin)?);
        }
    }

    Ok(Group {
        name,
        mode,
        options,
    })
}

fn parse_option(node: Node<'_, '_>) -> Result<PluginOption> {
    let name = node
        .attribute("name")
        .ok_or_else(|| missing_attribute("plugin", "name"))?
        .to_string();
    let mut files = Vec::new();
    let mut flags_on_select = Vec::new();

    for child in elements(node) {
        match child.tag_name().name() {
            "files" => files.extend(parse_copy_ops(child)?),
            "conditionFlags" => {
                for flag in children_named(child, "flag") {
                    let flag_name = flag
                        .attribute("name")
                        .ok_or_else(|| missing_attribute("flag", "name"))?;
                    flags_on_select
                        .push((flag_name.to_string(), text_content(flag).trim().to_string()));
                }
            }
            _ => {}
        }
    }

    Ok(PluginOption {
        name,
        files,
        flags_on_select,
    })
}

fn parse_copy_ops(node: Node<'_, '_>) -> Result<Vec<CopyOp>> {
    let mut ops = Vec::new();
    for child in elements(node) {
        let tag = child.tag_name().name();
        if tag != "file" && tag != "folder" {
            continue;
        }
        let source = child
            .attribute("source")
            .ok_or_else(|| missing_attribute(tag, "source"))?;
        let destination = child.attribute("destination").unwrap_or_default();
        ops.push(if tag == "file" {
            CopyOp::file(source, destination)
        } else {
            CopyOp::folder(source, destination)
        });
    }
    Ok(ops)
}

fn parse_conditional(node: Node<'_, '_>) -> Result<Vec<Pattern>> {
    let mut patterns = Vec::new();
    for list in children_named(node, "patterns") {
        for pattern in children_named(list, "pattern") {
            if let Some(pattern) = parse_pattern(pattern)? {
                patterns.push(pattern);
            }
        }
    }
    Ok(patterns)
}

fn parse_pattern(node: Node<'_, '_>) -> Result<Option<Pattern>> {
    let mut deps = None;
    let mut files = None;
    for child in elements(node) {
        let slot = match child.tag_name().name() {
            "dependencies" => &mut deps,
            "files" => &mut files,
            _ => continue,
        };
        if slot.replace(child).is_some() {
            return Err(malformed(format!(
                "pattern has more than one '{}' section",
                child.tag_name().name()
            )));
        }
    }

    let (Some(deps), Some(files)) = (deps, files) else {
        warn!("Ignoring conditional pattern without both 'dependencies' and 'files'");
        return Ok(None);
    };
    Ok(Some(Pattern {
        condition: parse_dependencies(deps)?,
        files: parse_copy_ops(files)?,
    }))
}

/// Render the element tree for `--xml-debug`
///
/// One line per element, tab-indented by depth, followed by its
/// attributes as `[name]{value}`.
pub fn describe_tree(text: &str) -> Result<String> {
    let doc = load(text)?;
    let mut out = String::new();
    describe_node(doc.root_element(), 0, &mut out);
    Ok(out)
}

fn describe_node(node: Node<'_, '_>, depth: usize, out: &mut String) {
    out.push_str(&"\t".repeat(depth));
    out.push_str(node.tag_name().name());
    out.push(' ');
    for attr in node.attributes() {
        let _ = write!(out, "[{}]{{{}}} ", attr.name(), attr.value());
    }
    out.push('\n');
    for child in elements(node) {
        describe_node(child, depth + 1, out);
    }
}

fn elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(Node::is_element)
}

fn children_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    elements(node).filter(move |n| n.tag_name().name() == name)
}

fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect()
}
