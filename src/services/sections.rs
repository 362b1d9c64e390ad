//! Section reconciliation planner
//!
//! The admin editor sends the full desired list of sections for a project or
//! event. This module classifies that input against the current database
//! rows into explicit create/update/delete sets as a pure function; the
//! repositories execute the resulting plan inside a single transaction
//! together with the parent row update.
//!
//! Rules:
//! - existing sections absent from the incoming list are deleted (their
//!   files go with them via FK cascade);
//! - incoming sections with a known id get a scalar update plus a nested
//!   file plan;
//! - incoming sections without an id (or with an id no longer present) are
//!   inserted with their files;
//! - file content never mutates in place: files missing from the incoming
//!   list are deleted, files without an id are inserted, kept files only
//!   receive a `display_order` correction when renumbering moves them.
//!
//! Incoming sections and files are re-numbered 0..n in `display_order`
//! order, so the contiguity invariant holds after every write.

use std::collections::HashSet;

use crate::models::section::{Section, SectionFileInput, SectionInput};

/// Scalar columns of a section row
#[derive(Debug, Clone, PartialEq)]
pub struct SectionScalars {
    pub title: Option<String>,
    pub title_en: Option<String>,
    pub content: Option<String>,
    pub content_en: Option<String>,
    pub background_color: Option<String>,
    pub display_order: i64,
}

/// Scalar columns of a section file row
#[derive(Debug, Clone, PartialEq)]
pub struct FileScalars {
    pub file_name: String,
    pub file_url: String,
    pub file_size: i64,
    pub mime_type: String,
    pub display_order: i64,
}

/// Plan for one section's files
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilePlan {
    /// Existing file ids to delete
    pub delete_ids: Vec<i64>,
    /// New files to insert
    pub inserts: Vec<FileScalars>,
    /// Kept files whose display_order changed: (id, new display_order)
    pub reorders: Vec<(i64, i64)>,
}

/// Update of an existing section
#[derive(Debug, Clone, PartialEq)]
pub struct SectionUpdate {
    pub id: i64,
    pub scalars: SectionScalars,
    pub files: FilePlan,
}

/// Insertion of a new section with its files
#[derive(Debug, Clone, PartialEq)]
pub struct SectionInsert {
    pub scalars: SectionScalars,
    pub files: Vec<FileScalars>,
}

/// Full reconciliation plan for a parent's sections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionPlan {
    /// Existing section ids to delete
    pub delete_ids: Vec<i64>,
    /// Existing sections to update
    pub updates: Vec<SectionUpdate>,
    /// New sections to insert
    pub inserts: Vec<SectionInsert>,
}

impl SectionPlan {
    /// Whether the plan changes anything beyond scalar updates
    pub fn is_empty(&self) -> bool {
        self.delete_ids.is_empty() && self.updates.is_empty() && self.inserts.is_empty()
    }
}

/// Build a reconciliation plan from the stored sections and the incoming
/// editor state.
pub fn plan(existing: &[Section], mut incoming: Vec<SectionInput>) -> SectionPlan {
    // Renumber incoming sections 0..n in display_order order
    incoming.sort_by_key(|s| s.display_order);

    let incoming_ids: HashSet<i64> = incoming.iter().filter_map(|s| s.id).collect();
    let existing_ids: HashSet<i64> = existing.iter().map(|s| s.id).collect();

    let delete_ids: Vec<i64> = existing
        .iter()
        .map(|s| s.id)
        .filter(|id| !incoming_ids.contains(id))
        .collect();

    let mut updates = Vec::new();
    let mut inserts = Vec::new();

    for (order, section) in incoming.into_iter().enumerate() {
        let scalars = SectionScalars {
            title: section.title,
            title_en: section.title_en,
            content: section.content,
            content_en: section.content_en,
            background_color: section.background_color,
            display_order: order as i64,
        };

        match section.id {
            Some(id) if existing_ids.contains(&id) => {
                let current = existing
                    .iter()
                    .find(|s| s.id == id)
                    .map(|s| s.files.as_slice())
                    .unwrap_or(&[]);
                updates.push(SectionUpdate {
                    id,
                    scalars,
                    files: plan_files(current, section.files),
                });
            }
            // Unknown or absent id: a new section
            _ => {
                inserts.push(SectionInsert {
                    scalars,
                    files: renumber_files(section.files),
                });
            }
        }
    }

    SectionPlan {
        delete_ids,
        updates,
        inserts,
    }
}

/// Build the file plan for one kept section.
fn plan_files(
    existing: &[crate::models::section::SectionFile],
    mut incoming: Vec<SectionFileInput>,
) -> FilePlan {
    incoming.sort_by_key(|f| f.display_order);

    let incoming_ids: HashSet<i64> = incoming.iter().filter_map(|f| f.id).collect();
    let existing_ids: HashSet<i64> = existing.iter().map(|f| f.id).collect();

    let delete_ids: Vec<i64> = existing
        .iter()
        .map(|f| f.id)
        .filter(|id| !incoming_ids.contains(id))
        .collect();

    let mut inserts = Vec::new();
    let mut reorders = Vec::new();

    for (order, file) in incoming.into_iter().enumerate() {
        let order = order as i64;
        match file.id {
            Some(id) if existing_ids.contains(&id) => {
                let stored = existing.iter().find(|f| f.id == id).map(|f| f.display_order);
                if stored != Some(order) {
                    reorders.push((id, order));
                }
            }
            _ => {
                inserts.push(FileScalars {
                    file_name: file.file_name,
                    file_url: file.file_url,
                    file_size: file.file_size,
                    mime_type: file.mime_type,
                    display_order: order,
                });
            }
        }
    }

    FilePlan {
        delete_ids,
        inserts,
        reorders,
    }
}

/// Renumber files of a brand-new section 0..n.
fn renumber_files(mut incoming: Vec<SectionFileInput>) -> Vec<FileScalars> {
    incoming.sort_by_key(|f| f.display_order);
    incoming
        .into_iter()
        .enumerate()
        .map(|(order, file)| FileScalars {
            file_name: file.file_name,
            file_url: file.file_url,
            file_size: file.file_size,
            mime_type: file.mime_type,
            display_order: order as i64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::section::SectionFile;

    fn stored_section(id: i64, order: i64, files: Vec<SectionFile>) -> Section {
        Section {
            id,
            title: Some(format!("Section {}", id)),
            title_en: None,
            content: Some("content".to_string()),
            content_en: None,
            background_color: None,
            display_order: order,
            files,
        }
    }

    fn stored_file(id: i64, order: i64) -> SectionFile {
        SectionFile {
            id,
            file_name: format!("file-{}.pdf", id),
            file_url: format!("/uploads/resource/file-{}.pdf", id),
            file_size: 100,
            mime_type: "application/pdf".to_string(),
            display_order: order,
        }
    }

    fn incoming_section(id: Option<i64>, order: i64) -> SectionInput {
        SectionInput {
            id,
            title: Some("Title".to_string()),
            title_en: None,
            content: Some("content".to_string()),
            content_en: None,
            background_color: None,
            display_order: order,
            files: vec![],
        }
    }

    fn incoming_file(id: Option<i64>, order: i64) -> SectionFileInput {
        SectionFileInput {
            id,
            file_name: "f.pdf".to_string(),
            file_url: "/uploads/resource/f.pdf".to_string(),
            file_size: 10,
            mime_type: "application/pdf".to_string(),
            display_order: order,
        }
    }

    #[test]
    fn test_empty_input_deletes_everything() {
        let existing = vec![stored_section(1, 0, vec![]), stored_section(2, 1, vec![])];
        let plan = plan(&existing, vec![]);

        assert_eq!(plan.delete_ids, vec![1, 2]);
        assert!(plan.updates.is_empty());
        assert!(plan.inserts.is_empty());
    }

    #[test]
    fn test_missing_section_deleted_present_updated_new_inserted() {
        let existing = vec![stored_section(1, 0, vec![]), stored_section(2, 1, vec![])];
        let incoming = vec![incoming_section(Some(2), 0), incoming_section(None, 1)];

        let plan = plan(&existing, incoming);

        assert_eq!(plan.delete_ids, vec![1]);
        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].id, 2);
        assert_eq!(plan.inserts.len(), 1);
    }

    #[test]
    fn test_sections_renumbered_contiguously() {
        let existing = vec![stored_section(1, 0, vec![])];
        // Sparse, out-of-order input
        let incoming = vec![
            incoming_section(None, 30),
            incoming_section(Some(1), 10),
            incoming_section(None, 20),
        ];

        let plan = plan(&existing, incoming);

        // Sorted by display_order: id=1 at 0, new at 1, new at 2
        assert_eq!(plan.updates[0].scalars.display_order, 0);
        let mut insert_orders: Vec<i64> = plan
            .inserts
            .iter()
            .map(|i| i.scalars.display_order)
            .collect();
        insert_orders.sort();
        assert_eq!(insert_orders, vec![1, 2]);
    }

    #[test]
    fn test_unknown_id_treated_as_insert() {
        let existing = vec![stored_section(1, 0, vec![])];
        let incoming = vec![incoming_section(Some(999), 0)];

        let plan = plan(&existing, incoming);

        assert_eq!(plan.delete_ids, vec![1]);
        assert!(plan.updates.is_empty());
        assert_eq!(plan.inserts.len(), 1);
    }

    #[test]
    fn test_file_diff_within_kept_section() {
        let existing = vec![stored_section(
            1,
            0,
            vec![stored_file(10, 0), stored_file(11, 1)],
        )];
        let mut section = incoming_section(Some(1), 0);
        // Keep file 11, drop file 10, add a new one
        section.files = vec![incoming_file(Some(11), 0), incoming_file(None, 1)];

        let plan = plan(&existing, vec![section]);

        let files = &plan.updates[0].files;
        assert_eq!(files.delete_ids, vec![10]);
        assert_eq!(files.inserts.len(), 1);
        assert_eq!(files.inserts[0].display_order, 1);
        // File 11 moves from stored order 1 to 0
        assert_eq!(files.reorders, vec![(11, 0)]);
    }

    #[test]
    fn test_kept_file_with_unchanged_order_not_touched() {
        let existing = vec![stored_section(1, 0, vec![stored_file(10, 0)])];
        let mut section = incoming_section(Some(1), 0);
        section.files = vec![incoming_file(Some(10), 0)];

        let plan = plan(&existing, vec![section]);

        let files = &plan.updates[0].files;
        assert!(files.delete_ids.is_empty());
        assert!(files.inserts.is_empty());
        assert!(files.reorders.is_empty());
    }

    #[test]
    fn test_new_section_files_renumbered() {
        let mut section = incoming_section(None, 0);
        section.files = vec![incoming_file(None, 5), incoming_file(None, 2)];

        let plan = plan(&[], vec![section]);

        let files = &plan.inserts[0].files;
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].display_order, 0);
        assert_eq!(files[1].display_order, 1);
    }

    #[test]
    fn test_identity_input_yields_scalar_updates_only() {
        let existing = vec![stored_section(1, 0, vec![stored_file(10, 0)])];
        let mut section = incoming_section(Some(1), 0);
        section.files = vec![incoming_file(Some(10), 0)];

        let plan = plan(&existing, vec![section]);

        assert!(plan.delete_ids.is_empty());
        assert!(plan.inserts.is_empty());
        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].files, FilePlan::default());
    }
}
