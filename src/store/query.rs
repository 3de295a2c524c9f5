//! Structured document queries

use std::fmt;

/// A search predicate understood by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `at(document.type, "<type>")`
    DocumentType(String),
    /// `at(my.<type>.uid, "<uid>")`
    Uid { doc_type: String, uid: String },
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::DocumentType(doc_type) => {
                write!(f, "[at(document.type,{})]", quote(doc_type))
            }
            Predicate::Uid { doc_type, uid } => {
                write!(f, "[at(my.{}.uid,{})]", doc_type, quote(uid))
            }
        }
    }
}

/// A page-limited query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub predicates: Vec<Predicate>,
    pub page_size: u32,
    pub page: u32,
}

impl Query {
    /// Every document of the given type, first page
    pub fn documents_of_type(doc_type: &str, page_size: u32) -> Self {
        Self {
            predicates: vec![Predicate::DocumentType(doc_type.to_string())],
            page_size,
            page: 1,
        }
    }

    /// The single document of `doc_type` with this UID
    pub fn by_uid(doc_type: &str, uid: &str) -> Self {
        Self {
            predicates: vec![Predicate::Uid {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            }],
            page_size: 1,
            page: 1,
        }
    }

    /// The `q` parameter of the search endpoint
    pub fn to_q(&self) -> String {
        let mut q = String::from("[");
        for predicate in &self.predicates {
            q.push_str(&predicate.to_string());
        }
        q.push(']');
        q
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
