// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pure readers for the XML documents served by the bizhub web console.
//
// Nothing in here touches the network: each function takes the document body
// and returns what the adapter needs, so captured printer responses can be
// tested directly.

use roxmltree::{Document, Node, ParsingOptions};

use jobsweep_core::types::JobId;

/// `JobStatus/Status` value marking a job that failed while printing.
pub const ERROR_PRINTING: &str = "ErrorPrinting";

/// Printer and scanner status codes from `/MFP/DeviceStatus`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceStatus {
    pub print_status: Option<String>,
    pub scan_status: Option<String>,
}

/// Parse a body, treating an empty document as "no document".
///
/// Some firmware prefixes its documents with a `<!DOCTYPE>`, so DTDs are
/// accepted.
fn parse(body: &str) -> Result<Option<Document<'_>>, roxmltree::Error> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(body, options).map(Some)
}

/// All elements reached by following `path` from the document root.
///
/// `path[0]` must name the root element; every later segment selects all
/// child elements with that name, like an absolute XPath location path
/// without predicates.
fn select<'a, 'input>(doc: &'a Document<'input>, path: &[&str]) -> Vec<Node<'a, 'input>> {
    let root = doc.root_element();
    let Some((first, rest)) = path.split_first() else {
        return Vec::new();
    };
    if root.tag_name().name() != *first {
        return Vec::new();
    }

    let mut current = vec![root];
    for segment in rest {
        current = current
            .iter()
            .flat_map(|node| children_named(*node, segment))
            .collect();
    }
    current
}

fn children_named<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == name)
}

fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == name)
        .and_then(|child| child.text())
}

/// Job IDs of every `Job` element under `job_path` whose
/// `JobStatus/Status` is exactly [`ERROR_PRINTING`], in document order.
///
/// Text is compared and returned as-is, without trimming. Jobs without a
/// `JobID` are skipped. A document that lacks the job list altogether yields
/// an empty list.
pub fn error_job_ids(body: &str, job_path: &[&str]) -> Result<Vec<JobId>, roxmltree::Error> {
    let Some(doc) = parse(body)? else {
        return Ok(Vec::new());
    };

    let ids = select(&doc, job_path)
        .into_iter()
        .filter(|job| {
            children_named(*job, "JobStatus")
                .flat_map(|status| children_named(status, "Status"))
                .any(|status| status.text() == Some(ERROR_PRINTING))
        })
        .filter_map(|job| child_text(job, "JobID"))
        .filter(|id| !id.is_empty())
        .map(JobId::from)
        .collect();

    Ok(ids)
}

/// Read `/MFP/DeviceStatus` verbatim. `None` when the element is absent.
pub fn device_status(body: &str) -> Result<Option<DeviceStatus>, roxmltree::Error> {
    let Some(doc) = parse(body)? else {
        return Ok(None);
    };

    Ok(select(&doc, &["MFP", "DeviceStatus"])
        .first()
        .map(|status| DeviceStatus {
            print_status: child_text(*status, "PrintStatus").map(str::to_string),
            scan_status: child_text(*status, "ScanStatus").map(str::to_string),
        }))
}
