use crate::assembly::{Label, LabelKind};
use crate::ast::NodeId;

// Labels are named after the id the parser gave their node, never after anything that changes
// between runs, so the same program always produces the same listing.

const fn local(kind: LabelKind, id: NodeId) -> Label {
    Label::Local { kind, id: id.0 }
}

pub struct IfLabels {
    pub else_branch: Label,
    pub end: Label,
}

impl IfLabels {
    pub const fn for_node(id: NodeId) -> Self {
        Self {
            else_branch: local(LabelKind::Else, id),
            end: local(LabelKind::EndIf, id),
        }
    }
}

pub struct WhileLabels {
    pub head: Label,
    pub end: Label,
}

impl WhileLabels {
    pub const fn for_node(id: NodeId) -> Self {
        Self {
            head: local(LabelKind::While, id),
            end: local(LabelKind::EndWhile, id),
        }
    }
}
