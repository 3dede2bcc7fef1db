//! Reveal-style deck markup.
//!
//! A deck is a sequence of top-level `<section>` elements; a top-level section
//! holding nested sections is a vertical stack whose nested sections are the
//! slides. Scanning streams the document once through `lol_html` and records
//! every slide plus every funnel container with its attributes and the bodies
//! of the comments it contains.

use crate::deck::error::DeckResult;
use crate::types::SlideRef;
use lol_html::html_content::{ContentType, EndTag};
use lol_html::{HandlerResult, RewriteStrSettings, doc_comments, element, rewrite_str};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

type EndHandler = Box<dyn FnOnce(&mut EndTag<'_>) -> HandlerResult>;

/// A funnel container found in the markup.
#[derive(Clone, Debug, PartialEq)]
pub struct ScannedContainer {
    pub slide: SlideRef,
    pub id: String,
    pub attributes: BTreeMap<String, String>,
    /// Comment bodies, in document order
    pub comments: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeckScan {
    /// Slides in document order
    pub slides: Vec<SlideRef>,
    /// Containers in document order
    pub containers: Vec<ScannedContainer>,
}

#[derive(Default)]
struct ScanState {
    section_depth: usize,
    h: usize,
    next_h: usize,
    v: usize,
    nested: usize,
    open_containers: Vec<usize>,
    scan: DeckScan,
}

impl ScanState {
    fn current_slide(&self) -> Option<SlideRef> {
        match self.section_depth {
            0 => None,
            1 => Some(SlideRef::new(self.h, 0)),
            _ => Some(SlideRef::new(self.h, self.v)),
        }
    }
}

/// Scan `html` for slides and for containers whose id starts with `prefix`.
///
/// Containers outside any section, and elements nested inside a container, are ignored.
pub fn scan_deck(html: &str, prefix: &str) -> DeckResult<DeckScan> {
    let state = Rc::new(RefCell::new(ScanState::default()));

    let sections = Rc::clone(&state);
    let containers = Rc::clone(&state);
    let comments = Rc::clone(&state);
    let prefix = prefix.to_string();

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("section", move |el| {
                    let depth = {
                        let mut s = sections.borrow_mut();
                        s.section_depth += 1;
                        match s.section_depth {
                            1 => {
                                s.h = s.next_h;
                                s.next_h += 1;
                                s.nested = 0;
                            }
                            2 => {
                                s.v = s.nested;
                                s.nested += 1;
                            }
                            _ => {}
                        }
                        s.section_depth
                    };

                    let closing = Rc::clone(&sections);
                    if let Some(handlers) = el.end_tag_handlers() {
                        let handler: EndHandler = Box::new(move |_end| {
                            let mut s = closing.borrow_mut();
                            match depth {
                                1 if s.nested == 0 => {
                                    let slide = SlideRef::new(s.h, 0);
                                    s.scan.slides.push(slide);
                                }
                                2 => {
                                    let slide = SlideRef::new(s.h, s.v);
                                    s.scan.slides.push(slide);
                                }
                                _ => {}
                            }
                            s.section_depth -= 1;
                            Ok(())
                        });
                        handlers.push(handler);
                    }
                    Ok(())
                }),
                element!("[id]", move |el| {
                    let Some(id) = el.get_attribute("id") else {
                        return Ok(());
                    };
                    if !id.starts_with(&prefix) {
                        return Ok(());
                    }

                    let index = {
                        let mut s = containers.borrow_mut();
                        if !s.open_containers.is_empty() {
                            // Rendered chart markup reuses the container id as a prefix
                            return Ok(());
                        }
                        let Some(slide) = s.current_slide() else {
                            tracing::debug!("Ignoring container {} outside any slide", id);
                            return Ok(());
                        };
                        let attributes = el
                            .attributes()
                            .iter()
                            .map(|a| (a.name(), a.value()))
                            .collect();
                        s.scan.containers.push(ScannedContainer {
                            slide,
                            id,
                            attributes,
                            comments: Vec::new(),
                        });
                        s.scan.containers.len() - 1
                    };

                    let closing = Rc::clone(&containers);
                    if let Some(handlers) = el.end_tag_handlers() {
                        containers.borrow_mut().open_containers.push(index);
                        let handler: EndHandler = Box::new(move |_end| {
                            closing.borrow_mut().open_containers.pop();
                            Ok(())
                        });
                        handlers.push(handler);
                    }
                    Ok(())
                }),
            ],
            document_content_handlers: vec![doc_comments!(move |c| {
                let mut s = comments.borrow_mut();
                if let Some(&index) = s.open_containers.last() {
                    let text = c.text();
                    s.scan.containers[index].comments.push(text);
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )?;

    let scan = std::mem::take(&mut state.borrow_mut().scan);
    Ok(scan)
}

/// Replace the inner content of the elements named in `rendered` (id to markup).
///
/// Comments listed in `preserved` for an id are written back ahead of the
/// markup, so a rendered deck keeps its inline configuration.
pub fn inject_markup(
    html: &str,
    rendered: &HashMap<String, String>,
    preserved: &HashMap<String, Vec<String>>,
) -> DeckResult<String> {
    let output = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("[id]", |el| {
                let Some(id) = el.get_attribute("id") else {
                    return Ok(());
                };
                if let Some(markup) = rendered.get(&id) {
                    let mut content = String::new();
                    for comment in preserved.get(&id).into_iter().flatten() {
                        content.push_str("<!--");
                        content.push_str(comment);
                        content.push_str("-->");
                    }
                    content.push_str(markup);
                    el.set_inner_content(&content, ContentType::Html);
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )?;
    Ok(output)
}
