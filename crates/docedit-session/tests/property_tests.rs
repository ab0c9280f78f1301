//! Property-based tests for docedit-session
//!
//! Random edit, save and cancel sequences checked against a plain model of
//! live and saved page titles.

use std::collections::HashMap;

use docedit_core::FieldValue;
use docedit_session::{Session, SessionState, Upload};
use proptest::prelude::*;

/// Zero-based pages that carry an editable title
const TITLED_PAGES: [usize; 3] = [5, 6, 7];

fn loaded_session() -> Session {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let session = Session::default();
    runtime
        .block_on(session.load(Upload::new(
            "proposal.pdf",
            "application/pdf",
            b"%PDF-1.7\n%stub".to_vec(),
        )))
        .unwrap();
    session
}

fn title(session: &Session, page: usize) -> String {
    match session.get_field(page, "title").unwrap() {
        FieldValue::Text(value) => value,
        other => panic!("title on page {} is not text: {:?}", page, other),
    }
}

#[derive(Debug, Clone)]
enum Op {
    Edit { page: usize, value: String },
    Save,
    Cancel,
}

// ============================================================
// Strategies
// ============================================================

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (prop::sample::select(TITLED_PAGES.to_vec()), "[A-Za-z ]{1,20}")
            .prop_map(|(page, value)| Op::Edit { page, value }),
        1 => Just(Op::Save),
        1 => Just(Op::Cancel),
    ]
}

/// What the session should hold after the same operations
struct Model {
    live: HashMap<usize, String>,
    saved: HashMap<usize, String>,
    dirty: bool,
}

impl Model {
    fn of(session: &Session) -> Self {
        let live: HashMap<usize, String> = TITLED_PAGES
            .iter()
            .map(|&page| (page, title(session, page)))
            .collect();
        Self {
            saved: live.clone(),
            live,
            dirty: false,
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // ============================================================
    // Dirty Flag and Snapshots
    // ============================================================

    #[test]
    fn edit_save_cancel_sequences_match_model(ops in prop::collection::vec(op(), 1..24)) {
        let session = loaded_session();
        let mut model = Model::of(&session);

        for op in ops {
            match op {
                Op::Edit { page, value } => {
                    if session.state() != SessionState::Editing {
                        session.begin_edit().unwrap();
                    }
                    session.commit_edit(page, "title", &value).unwrap();
                    model.live.insert(page, value);
                    model.dirty = true;
                }
                Op::Save => {
                    if session.state() == SessionState::Editing {
                        session.save_all().unwrap();
                        model.saved = model.live.clone();
                        model.dirty = false;
                    }
                }
                Op::Cancel => {
                    if session.state() == SessionState::Editing {
                        session.cancel_edit().unwrap();
                        model.live = model.saved.clone();
                        model.dirty = false;
                    }
                }
            }

            prop_assert_eq!(session.is_dirty(), model.dirty);
            for page in TITLED_PAGES {
                prop_assert_eq!(&title(&session, page), &model.live[&page]);
            }
        }
    }

    #[test]
    fn cancel_after_any_edits_restores_loaded_titles(
        edits in prop::collection::vec(
            (prop::sample::select(TITLED_PAGES.to_vec()), "[A-Za-z ]{1,20}"),
            1..12
        )
    ) {
        let session = loaded_session();
        let model = Model::of(&session);

        session.begin_edit().unwrap();
        for (page, value) in &edits {
            session.commit_edit(*page, "title", value).unwrap();
        }
        prop_assert!(session.is_dirty());

        session.cancel_edit().unwrap();
        prop_assert!(!session.is_dirty());
        prop_assert_eq!(session.state(), SessionState::Viewing);
        for page in TITLED_PAGES {
            prop_assert_eq!(&title(&session, page), &model.saved[&page]);
        }
    }
}
