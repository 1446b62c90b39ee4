use speculate2::speculate;

speculate! {
    use eaiser::models::{CreateCategoryInput, CreateMarkdownNoteInput};
    use eaiser::Database;

    describe "category subtree resolution" {
        it "contains the root and is closed under the child relation" {
            let db = Database::open_in_memory().unwrap();
            db.migrate().unwrap();

            let root = db.create_category(CreateCategoryInput {
                name: "root".into(), color_preset_id: None, parent_id: None,
            }).unwrap();
            let child = db.create_category(CreateCategoryInput {
                name: "child".into(), color_preset_id: None, parent_id: Some(root.id),
            }).unwrap();
            let grandchild = db.create_category(CreateCategoryInput {
                name: "grandchild".into(), color_preset_id: None, parent_id: Some(child.id),
            }).unwrap();
            let unrelated = db.create_category(CreateCategoryInput {
                name: "unrelated".into(), color_preset_id: None, parent_id: None,
            }).unwrap();

            let members = db.category_subtree(root.id).unwrap();
            assert!(members.contains(&root.id));
            assert!(members.contains(&child.id));
            assert!(members.contains(&grandchild.id));
            assert!(!members.contains(&unrelated.id));
        }

        it "is idempotent" {
            let db = Database::open_in_memory().unwrap();
            db.migrate().unwrap();

            let root = db.create_category(CreateCategoryInput {
                name: "root".into(), color_preset_id: None, parent_id: None,
            }).unwrap();
            db.create_category(CreateCategoryInput {
                name: "child".into(), color_preset_id: None, parent_id: Some(root.id),
            }).unwrap();

            let first = db.category_subtree(root.id).unwrap();
            let second = db.category_subtree(root.id).unwrap();
            assert_eq!(first, second);
        }
    }

    describe "scoped note listing" {
        it "surfaces a note created under a child category" {
            let db = Database::open_in_memory().unwrap();
            db.migrate().unwrap();

            let blender = db.create_category(CreateCategoryInput {
                name: "Blender".into(), color_preset_id: None, parent_id: None,
            }).unwrap();
            let rigging = db.create_category(CreateCategoryInput {
                name: "Rigging".into(), color_preset_id: None, parent_id: Some(blender.id),
            }).unwrap();
            let note = db.create_markdown_note(CreateMarkdownNoteInput {
                title: "bones".into(),
                language: "markdown".into(),
                content_md: "hello".into(),
                category_id: rigging.id,
                kind: None,
            }).unwrap();

            let listed = db.list_notes(Some(blender.id)).unwrap();
            assert!(listed.iter().any(|n| n.id == note.id));
        }

        it "returns exactly the notes whose category is in the subtree" {
            let db = Database::open_in_memory().unwrap();
            db.migrate().unwrap();

            let inside = db.create_category(CreateCategoryInput {
                name: "inside".into(), color_preset_id: None, parent_id: None,
            }).unwrap();
            let outside = db.create_category(CreateCategoryInput {
                name: "outside".into(), color_preset_id: None, parent_id: None,
            }).unwrap();

            db.create_markdown_note(CreateMarkdownNoteInput {
                title: "in".into(), language: "".into(), content_md: "x".into(),
                category_id: inside.id, kind: None,
            }).unwrap();
            db.create_markdown_note(CreateMarkdownNoteInput {
                title: "out".into(), language: "".into(), content_md: "y".into(),
                category_id: outside.id, kind: None,
            }).unwrap();

            let members = db.category_subtree(inside.id).unwrap();
            let listed = db.list_notes(Some(inside.id)).unwrap();
            assert_eq!(listed.len(), 1);
            assert!(listed.iter().all(|n| members.contains(&n.category_id)));
        }
    }
}
