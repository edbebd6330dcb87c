//! Thin helpers over html5ever's reference DOM.

use std::rc::Rc;

use html5ever::parse_document;
use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// Parse raw markup into a DOM tree.
pub fn html_to_dom(data: &[u8]) -> RcDom {
    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut &data[..])
        .unwrap()
}

/// Get the local tag name of an element node.
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// Get an attribute value of an element node.
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => {
            for attr in attrs.borrow().iter() {
                if &*attr.name.local == attr_name {
                    return Some(attr.value.to_string());
                }
            }
            None
        }
        _ => None,
    }
}

/// Literal text content of a node: the concatenation of its direct text
/// children.
pub fn get_text_content(node: &Handle) -> String {
    let mut text = String::new();
    for child in node.children.borrow().iter() {
        if let NodeData::Text { ref contents } = child.data {
            text.push_str(&contents.borrow());
        }
    }
    text
}

/// Detach a child from its parent's child list.
pub fn remove_child(parent: &Handle, child: &Handle) {
    parent
        .children
        .borrow_mut()
        .retain(|other| !Rc::ptr_eq(other, child));
}

/// Serialize a document tree back to markup.
pub fn serialize_document(dom: &RcDom) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let serializable: SerializableHandle = dom.document.clone().into();
    serialize(&mut buf, &serializable, SerializeOpts::default())
        .expect("unable to serialize DOM into buffer");
    String::from_utf8_lossy(&buf).into_owned()
}
