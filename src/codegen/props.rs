//! Prop ops and the block's data table.

use indexmap::IndexSet;

use crate::ir::PropertyKind;

use super::annotate::SNode;
use super::exprs::ExprMap;
use super::opcode::{CommonProp, PropOp};

/// Keys referenced by prop ops, deduplicated in first-use order.
#[derive(Debug, Default)]
pub(crate) struct DataTable {
    keys: IndexSet<String>,
}

impl DataTable {
    pub fn index(&mut self, key: &str) -> u32 {
        if let Some(i) = self.keys.get_index_of(key) {
            return i as u32;
        }
        self.keys.insert_full(key.to_string()).0 as u32
    }

    pub fn into_vec(self) -> Vec<String> {
        self.keys.into_iter().collect()
    }
}

pub(crate) fn emit_prop_ops(root: &SNode<'_>, exprs: &ExprMap) -> (Vec<PropOp>, Vec<String>) {
    let mut ops = Vec::new();
    let mut data = DataTable::default();
    emit(&mut ops, &mut data, root, true, exprs);
    (ops, data.into_vec())
}

fn emit(
    ops: &mut Vec<PropOp>,
    data: &mut DataTable,
    node: &SNode<'_>,
    is_root: bool,
    exprs: &ExprMap,
) {
    let Some(element) = node.element() else {
        return;
    };
    if node.props_exprs > 0 {
        if !is_root {
            ops.push(PropOp::SetNode(node.slot));
        }
        for prop in &element.properties {
            let Some(input) = prop.expr().and_then(|id| exprs.index_of(id)) else {
                continue;
            };
            let key = prop.key.as_str();
            let op = match prop.kind {
                PropertyKind::Attribute if key == "class" => PropOp::Common {
                    prop: CommonProp::ClassName,
                    input,
                },
                PropertyKind::Value | PropertyKind::DomValue if key == "textContent" => {
                    PropOp::Common {
                        prop: CommonProp::TextContent,
                        input,
                    }
                }
                PropertyKind::Value | PropertyKind::DomValue if key == "innerHTML" => {
                    PropOp::Common {
                        prop: CommonProp::InnerHtml,
                        input,
                    }
                }
                PropertyKind::Attribute => PropOp::Attribute {
                    key: data.index(key),
                    input,
                },
                PropertyKind::Value => PropOp::Property {
                    key: data.index(key),
                    input,
                },
                PropertyKind::DomValue => PropOp::DiffDomProperty {
                    key: data.index(key),
                    input,
                },
                PropertyKind::Style => PropOp::Style {
                    key: data.index(key),
                    input,
                },
                PropertyKind::Event => PropOp::Event {
                    key: data.index(key),
                    input,
                },
                PropertyKind::Directive => PropOp::Directive { input },
            };
            ops.push(op);
        }
    }

    for child in &node.children {
        emit(ops, data, child, false, exprs);
    }
}
