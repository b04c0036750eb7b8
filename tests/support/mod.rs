//! Mock DOM runtime for integration tests.
//!
//! `instantiate` parses a block's shell, runs its encoded state, prop and
//! child streams, and returns the serialized tree. `render` builds the same
//! tree straight from the template. The two must agree for every input.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use tplc::artifact::{EncodedBlock, EncodedNode, EncodedShell};
use tplc::codegen::is_void_element;
use tplc::codegen::opcode::{child_op, prop_op, state_op, template_flags};
use tplc::ir::{Element, ExprId, Node, PropertyKind, PropertyValue, Template};

// ─── Values ────────────────────────────────────────────────────────

/// Runtime value bound to a placeholder.
#[derive(Clone, Debug)]
pub enum Value {
    Str(String),
    Bool(bool),
    /// Child value rendering no DOM nodes.
    Empty,
    /// Child value rendering one text node per entry.
    Many(Vec<String>),
}

pub type Values = HashMap<ExprId, Value>;

/// Distinct, recognizable value for every placeholder.
pub fn default_values(max_id: u32) -> Values {
    (0..=max_id)
        .map(|i| {
            let v = match i % 4 {
                0 => Value::Str(format!("v{}", i)),
                1 => Value::Many(vec![format!("m{}a", i), format!("m{}b", i)]),
                2 => Value::Empty,
                _ => Value::Bool(true),
            };
            (ExprId(i), v)
        })
        .collect()
}

impl Value {
    fn as_str(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Empty => String::new(),
            Value::Many(items) => items.concat(),
        }
    }

    fn child_texts(&self) -> Vec<String> {
        match self {
            Value::Str(s) => vec![s.clone()],
            Value::Bool(b) => vec![b.to_string()],
            Value::Empty => Vec::new(),
            Value::Many(items) => items.clone(),
        }
    }
}

// ─── DOM ───────────────────────────────────────────────────────────

type NodeId = usize;

#[derive(Clone, Debug)]
enum Kind {
    Element {
        tag: String,
        attrs: BTreeMap<String, String>,
        styles: BTreeMap<String, String>,
    },
    Text(String),
    Comment,
}

#[derive(Clone, Debug)]
struct DomNode {
    kind: Kind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Default)]
pub struct Dom {
    nodes: Vec<DomNode>,
}

impl Dom {
    fn create(&mut self, kind: Kind) -> NodeId {
        self.nodes.push(DomNode {
            kind,
            parent: None,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    fn element(&mut self, tag: &str) -> NodeId {
        self.create(Kind::Element {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            styles: BTreeMap::new(),
        })
    }

    fn append(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, next: Option<NodeId>) {
        self.nodes[child].parent = Some(parent);
        let pos = match next {
            Some(n) => self.index_in_parent(parent, n),
            None => self.nodes[parent].children.len(),
        };
        self.nodes[parent].children.insert(pos, child);
    }

    fn index_in_parent(&self, parent: NodeId, child: NodeId) -> usize {
        self.nodes[parent]
            .children
            .iter()
            .position(|&c| c == child)
            .expect("anchor is a child of the parent")
    }

    fn remove(&mut self, node: NodeId) {
        let parent = self.nodes[node].parent.expect("removed node has a parent");
        let pos = self.index_in_parent(parent, node);
        self.nodes[parent].children.remove(pos);
        self.nodes[node].parent = None;
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node].children.first().copied()
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.nodes[node].parent?;
        let pos = self.index_in_parent(parent, node);
        self.nodes[parent].children.get(pos + 1).copied()
    }

    fn set_text_content(&mut self, node: NodeId, text: String) {
        for child in std::mem::take(&mut self.nodes[node].children) {
            self.nodes[child].parent = None;
        }
        if !text.is_empty() {
            let t = self.create(Kind::Text(text));
            self.append(node, t);
        }
    }

    fn attrs_mut(&mut self, node: NodeId) -> (&mut BTreeMap<String, String>, &mut BTreeMap<String, String>) {
        match &mut self.nodes[node].kind {
            Kind::Element { attrs, styles, .. } => (attrs, styles),
            other => panic!("expected an element, got {:?}", other),
        }
    }

    fn set_attr(&mut self, node: NodeId, key: &str, value: String) {
        if key == "style" {
            let (_, styles) = self.attrs_mut(node);
            for decl in value.split(';').filter(|d| !d.is_empty()) {
                let (k, v) = decl.split_once(':').expect("style declaration");
                styles.insert(k.to_string(), v.to_string());
            }
        } else {
            self.attrs_mut(node).0.insert(key.to_string(), value);
        }
    }

    fn set_style(&mut self, node: NodeId, key: &str, value: String) {
        self.attrs_mut(node).1.insert(key.to_string(), value);
    }

    /// Serialize with attributes and styles in key order.
    pub fn serialize(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node].kind {
            Kind::Text(t) => out.push_str(t),
            Kind::Comment => out.push_str("<!>"),
            Kind::Element { tag, attrs, styles } => {
                out.push('<');
                out.push_str(tag);
                for (k, v) in attrs {
                    out.push_str(&format!(" {}=\"{}\"", k, v));
                }
                if !styles.is_empty() {
                    let decls: Vec<String> =
                        styles.iter().map(|(k, v)| format!("{}:{}", k, v)).collect();
                    out.push_str(&format!(" style=\"{}\"", decls.join(";")));
                }
                out.push('>');
                for &c in &self.nodes[node].children {
                    self.serialize(c, out);
                }
                if !is_void_element(tag) {
                    out.push_str(&format!("</{}>", tag));
                }
            }
        }
    }

    /// Mount a child value under `parent` before `next`. Returns the first
    /// mounted node.
    fn mount(&mut self, parent: NodeId, next: Option<NodeId>, value: &Value) -> Option<NodeId> {
        let mut first = None;
        for text in value.child_texts() {
            let t = self.create(Kind::Text(text));
            self.insert_before(parent, t, next);
            first.get_or_insert(t);
        }
        first
    }
}

// ─── Shell parsing ─────────────────────────────────────────────────

/// Parse shell markup into a detached element tree. Returns the root.
fn parse_shell(dom: &mut Dom, markup: &str) -> NodeId {
    let mut stack: Vec<NodeId> = Vec::new();
    let mut root = None;
    let mut rest = markup;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!>") {
            let c = dom.create(Kind::Comment);
            dom.append(*stack.last().expect("comment inside an element"), c);
            rest = after;
        } else if let Some(after) = rest.strip_prefix("</") {
            let end = after.find('>').expect("closing tag ends");
            stack.pop();
            rest = &after[end + 1..];
        } else if let Some(after) = rest.strip_prefix('<') {
            let end = after.find('>').expect("opening tag ends");
            let (tag, attrs) = parse_open_tag(&after[..end]);
            let e = dom.element(tag);
            for (k, v) in attrs {
                dom.set_attr(e, &k, v);
            }
            match stack.last() {
                Some(&parent) => dom.append(parent, e),
                None => root = Some(e),
            }
            if !is_void_element(tag) {
                stack.push(e);
            }
            rest = &after[end + 1..];
        } else {
            let end = rest.find('<').unwrap_or(rest.len());
            let t = dom.create(Kind::Text(rest[..end].to_string()));
            dom.append(*stack.last().expect("text inside an element"), t);
            rest = &rest[end..];
        }
    }

    root.expect("shell has a root element")
}

fn parse_open_tag(s: &str) -> (&str, Vec<(String, String)>) {
    let (tag, mut rest) = s.split_once(' ').map_or((s, ""), |(t, r)| (t, r));
    let mut attrs = Vec::new();
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let name_end = rest.find(|c: char| c == '=' || c == ' ').unwrap_or(rest.len());
        let name = &rest[..name_end];
        if rest[name_end..].starts_with("=\"") {
            let value_start = name_end + 2;
            let value_end = value_start + rest[value_start..].find('"').expect("quoted value ends");
            attrs.push((name.to_string(), rest[value_start..value_end].to_string()));
            rest = &rest[value_end + 1..];
        } else {
            attrs.push((name.to_string(), String::new()));
            rest = &rest[name_end..];
        }
    }
    (tag, attrs)
}

// ─── Runtime ───────────────────────────────────────────────────────

/// Clone the block's shell and apply its instruction streams.
pub fn instantiate(dom: &mut Dom, block: &EncodedBlock, values: &Values) -> NodeId {
    let markup = match &block.template {
        EncodedShell::Tag(tag) if is_void_element(tag) => format!("<{}>", tag),
        EncodedShell::Tag(tag) => format!("<{}></{}>", tag, tag),
        EncodedShell::Chunks(chunks) => chunks.concat(),
    };
    let root = parse_shell(dom, &markup);

    let state_slots = (block.flags & template_flags::MASK6) as usize;
    let mut state: Vec<Option<NodeId>> = vec![None; state_slots.max(1)];
    state[0] = Some(root);
    let mut si = 0;
    if !block.state.is_empty() {
        let first = dom.first_child(root);
        walk(dom, &block.state, 0, block.state.len(), first, &mut state, &mut si);
    }
    assert_eq!(si + 1, state_slots, "state walk filled every declared slot");

    let value = |input: u32| lookup(block, values, input);
    let slot = |state: &[Option<NodeId>], i: u32| state[i as usize].expect("state slot was filled");

    let mut target = root;
    for &op in &block.props {
        let input = (op >> prop_op::INPUT_SHIFT) & prop_op::MASK6;
        let data = op >> prop_op::DATA_SHIFT;
        match op & prop_op::TYPE_MASK {
            prop_op::SET_NODE => target = slot(&state, data),
            prop_op::COMMON => match data {
                0 => dom.set_attr(target, "class", value(input).as_str()),
                _ => dom.set_text_content(target, value(input).as_str()),
            },
            prop_op::ATTRIBUTE => match value(input) {
                Value::Bool(false) => {}
                Value::Bool(true) => dom.set_attr(target, &block.data[data as usize], String::new()),
                v => dom.set_attr(target, &block.data[data as usize], v.as_str()),
            },
            prop_op::PROPERTY | prop_op::DIFF_DOM_PROPERTY => {
                let key = format!(".{}", block.data[data as usize]);
                dom.set_attr(target, &key, value(input).as_str());
            }
            prop_op::STYLE => dom.set_style(target, &block.data[data as usize], value(input).as_str()),
            _ => {}
        }
    }

    let mut parent = root;
    let mut next = None;
    for &op in &block.child {
        let v = op >> child_op::VALUE_SHIFT;
        match op & child_op::TYPE {
            child_op::CHILD => {
                if let Some(first) = dom.mount(parent, next, value(v)) {
                    next = Some(first);
                }
            }
            child_op::SET_NEXT => next = Some(slot(&state, v)),
            child_op::SET_PARENT => {
                parent = slot(&state, v);
                next = None;
            }
            other => panic!("unknown child op type {}", other),
        }
    }

    root
}

static EMPTY: Value = Value::Empty;

fn lookup<'a>(block: &EncodedBlock, values: &'a Values, input: u32) -> &'a Value {
    let id = block.exprs[input as usize];
    values.get(&ExprId(id)).unwrap_or(&EMPTY)
}

fn walk(
    dom: &mut Dom,
    ops: &[u32],
    mut i: usize,
    end: usize,
    mut cur: Option<NodeId>,
    state: &mut [Option<NodeId>],
    si: &mut usize,
) {
    loop {
        let op = ops[i];
        i += 1;
        let node = cur.expect("state walk stays within the shell");
        if op & state_op::SAVE != 0 {
            *si += 1;
            state[*si] = Some(node);
        }
        if op & state_op::ENTER_OR_REMOVE != 0 {
            let offset = (op >> state_op::OFFSET_SHIFT) as usize;
            if offset > 0 {
                let first = dom.first_child(node);
                walk(dom, ops, i, i + offset, first, state, si);
                i += offset;
            } else {
                assert!(matches!(dom.nodes[node].kind, Kind::Comment), "remove targets an anchor");
                let text = dom.next_sibling(node);
                *si += 1;
                state[*si] = text;
                dom.remove(node);
                cur = text;
            }
        }
        if i == end {
            return;
        }
        cur = cur.and_then(|n| dom.next_sibling(n));
    }
}

/// Instantiate every root of an encoded artifact; serialized roots in order.
pub fn run_artifact(roots: &[EncodedNode], values: &Values) -> Vec<String> {
    let mut dom = Dom::default();
    roots
        .iter()
        .map(|root| match root {
            EncodedNode::Block(block) => {
                let node = instantiate(&mut dom, block, values);
                let mut out = String::new();
                dom.serialize(node, &mut out);
                out
            }
            EncodedNode::Text { value } => value.clone(),
            EncodedNode::Expr { value } => values
                .get(&ExprId(*value))
                .map(|v| v.child_texts().concat())
                .unwrap_or_default(),
        })
        .collect()
}

// ─── Direct rendering ──────────────────────────────────────────────

/// Render the template without going through the compiler.
pub fn render(template: &Template, values: &Values) -> Vec<String> {
    let mut dom = Dom::default();
    template
        .children
        .iter()
        .map(|root| match root {
            Node::Element(e) => {
                let node = render_element(&mut dom, e, values);
                let mut out = String::new();
                dom.serialize(node, &mut out);
                out
            }
            Node::Text { value } => value.clone(),
            Node::Expr { value } => values
                .get(value)
                .map(|v| v.child_texts().concat())
                .unwrap_or_default(),
        })
        .collect()
}

fn render_element(dom: &mut Dom, element: &Element, values: &Values) -> NodeId {
    let node = dom.element(&element.tag);

    for child in &element.children {
        match child {
            Node::Element(e) => {
                let c = render_element(dom, e, values);
                dom.append(node, c);
            }
            Node::Text { value } if !value.is_empty() => {
                let t = dom.create(Kind::Text(value.clone()));
                dom.append(node, t);
            }
            Node::Text { .. } => {}
            Node::Expr { value } => {
                let v = values.get(value).cloned().unwrap_or(Value::Empty);
                dom.mount(node, None, &v);
            }
        }
    }

    // Static properties first, then dynamic ones in declaration order.
    for prop in &element.properties {
        match (prop.kind, &prop.value) {
            (PropertyKind::Attribute, PropertyValue::String(v)) => dom.set_attr(node, &prop.key, v.clone()),
            (PropertyKind::Attribute, PropertyValue::Bool(true)) => {
                dom.set_attr(node, &prop.key, String::new())
            }
            (PropertyKind::Style, PropertyValue::String(v)) => dom.set_style(node, &prop.key, v.clone()),
            _ => {}
        }
    }
    for prop in &element.properties {
        let PropertyValue::Expr(id) = prop.value else {
            continue;
        };
        let v = values.get(&id).cloned().unwrap_or(Value::Empty);
        match prop.kind {
            PropertyKind::Attribute if prop.key == "class" => dom.set_attr(node, "class", v.as_str()),
            PropertyKind::Attribute => match v {
                Value::Bool(false) => {}
                Value::Bool(true) => dom.set_attr(node, &prop.key, String::new()),
                v => dom.set_attr(node, &prop.key, v.as_str()),
            },
            PropertyKind::Value | PropertyKind::DomValue
                if prop.key == "textContent" || prop.key == "innerHTML" =>
            {
                dom.set_text_content(node, v.as_str())
            }
            PropertyKind::Value | PropertyKind::DomValue => {
                dom.set_attr(node, &format!(".{}", prop.key), v.as_str())
            }
            PropertyKind::Style => dom.set_style(node, &prop.key, v.as_str()),
            PropertyKind::Event | PropertyKind::Directive => {}
        }
    }

    node
}

// ─── Template generator ────────────────────────────────────────────

/// xorshift64; deterministic so failures reproduce.
pub struct Rng(u64);

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng(seed.max(1))
    }

    pub fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    pub fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

const TAGS: &[&str] = &["div", "span", "p", "a", "ul", "li", "b"];
const VOID_TAGS: &[&str] = &["br", "img", "input"];

/// Random element tree. Placeholder ids are handed out from `next_id`.
pub fn random_element(rng: &mut Rng, depth: u32, next_id: &mut u32) -> Element {
    if rng.below(8) == 0 {
        return Element::new(VOID_TAGS[rng.below(VOID_TAGS.len() as u64) as usize]);
    }
    let mut element = Element::new(TAGS[rng.below(TAGS.len() as u64) as usize]);

    for _ in 0..rng.below(3) {
        let prop = match rng.below(6) {
            0 => tplc::ir::Property::attribute("title", "t"),
            1 => tplc::ir::Property::style("top", "1px"),
            2 => tplc::ir::Property::attribute("class", take(next_id)),
            3 => tplc::ir::Property::attribute("data-x", take(next_id)),
            4 => tplc::ir::Property::style("color", take(next_id)),
            _ => tplc::ir::Property::value("value", take(next_id).0),
        };
        element = element.with_property(prop);
    }

    let count = if depth == 0 { 0 } else { rng.below(5) };
    for _ in 0..count {
        let child: Node = match rng.below(5) {
            0 | 1 => Node::Expr { value: take(next_id) },
            2 => Node::text(["x", "yy", ""][rng.below(3) as usize]),
            _ => random_element(rng, depth - 1, next_id).into(),
        };
        element = element.with_child(child);
    }
    element
}

fn take(next_id: &mut u32) -> ExprId {
    let id = ExprId(*next_id);
    *next_id += 1;
    id
}
