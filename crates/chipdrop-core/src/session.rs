//! Drag session state machine.
//!
//! Mouse drag events and touch events are both reduced to [`Gesture`]s and
//! fed through one [`DragController`]. The controller owns the session (what
//! is being dragged, by which input, and its floating feedback), runs the drop
//! through the resolver and mutator, and guarantees that every way out of a
//! session leaves no feedback behind.
//!
//! ```text
//!          Start(palette)                     Start(chip)
//!   Idle ────────────────▶ DraggingPalette    Idle ─────────▶ DraggingChip
//!    ▲                        │ Move* Drop?                      │ Move* Drop?
//!    └────────── End / Cancel ┘          ▲───────── End / Cancel ┘
//! ```

use smol_str::SmolStr;

use crate::document::EditorDocument;
use crate::error::EditError;
use crate::label_edit::LabelEdit;
use crate::mutator::{ChipRef, Edit, EditOutcome, MutatorOptions, apply_edit};
use crate::platform::DragPlatform;
use crate::resolve::{PositionGeometry, resolve_drop_position};
use crate::trash::{self, TrashState};
use crate::types::Point;

/// The input device driving a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Mouse,
    Touch,
}

/// What a drag picked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOrigin<E> {
    /// A palette item. Dropping it creates a new chip.
    Palette { element: E, text: SmolStr },
    /// A chip already in the document. Its position is looked up again at
    /// drop time through the element.
    Chip { element: E, text: SmolStr },
}

impl<E> DragOrigin<E> {
    pub fn element(&self) -> &E {
        match self {
            DragOrigin::Palette { element, .. } | DragOrigin::Chip { element, .. } => element,
        }
    }

    pub fn text(&self) -> &SmolStr {
        match self {
            DragOrigin::Palette { text, .. } | DragOrigin::Chip { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GesturePhase<E> {
    Start(DragOrigin<E>),
    Move,
    /// Explicit drop (mouse `drop`). Touch has none; its `End` drops.
    Drop,
    End,
    Cancel,
}

/// One step of pointer input.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture<E> {
    pub phase: GesturePhase<E>,
    pub modality: Modality,
    pub point: Point,
}

impl<E> Gesture<E> {
    pub fn new(phase: GesturePhase<E>, modality: Modality, point: Point) -> Self {
        Self {
            phase,
            modality,
            point,
        }
    }
}

/// Observable state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    DraggingPaletteItem,
    DraggingDocumentChip,
}

/// Result of a drop attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// The document was edited (or the edit was a valid no-op).
    Applied(EditOutcome),
    /// Released somewhere that does nothing: outside the document and trash,
    /// or a palette item over the trash.
    Cancelled,
    /// The point could not be resolved to a position, so the host should fall
    /// back to its default handling.
    NotHandled,
    /// The edit failed validation. The document is unchanged and must stay
    /// so: the host consumes the drop rather than falling back.
    Rejected(EditError),
}

impl DropOutcome {
    /// Whether the host should consume the drop event.
    ///
    /// Only an unresolved point falls through to default handling.
    pub fn is_handled(&self) -> bool {
        !matches!(self, DropOutcome::NotHandled)
    }
}

fn detached(text: &SmolStr) -> DropOutcome {
    let err = EditError::DetachedChip {
        expected: text.clone(),
    };
    tracing::warn!(%err, "drop rejected");
    DropOutcome::Rejected(err)
}

struct Session<E, F> {
    origin: DragOrigin<E>,
    modality: Modality,
    feedback: Option<F>,
    dropped: bool,
}

/// Drives drag sessions against a platform.
pub struct DragController<P: DragPlatform> {
    platform: P,
    options: MutatorOptions,
    session: Option<Session<P::Element, P::Feedback>>,
    trash: TrashState,
    label_edit: Option<LabelEdit>,
}

impl<P: DragPlatform> DragController<P> {
    pub fn new(platform: P, options: MutatorOptions) -> Self {
        Self {
            platform,
            options,
            session: None,
            trash: TrashState::default(),
            label_edit: None,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn state(&self) -> DragState {
        match self.session.as_ref().map(|s| &s.origin) {
            None => DragState::Idle,
            Some(DragOrigin::Palette { .. }) => DragState::DraggingPaletteItem,
            Some(DragOrigin::Chip { .. }) => DragState::DraggingDocumentChip,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    /// Modality of the active session.
    pub fn modality(&self) -> Option<Modality> {
        self.session.as_ref().map(|s| s.modality)
    }

    /// Text of whatever is being dragged.
    pub fn subject_text(&self) -> Option<&SmolStr> {
        self.session.as_ref().map(|s| s.origin.text())
    }

    pub fn is_trash_hovered(&self) -> bool {
        self.trash.is_hovered()
    }

    /// Feed one gesture through the state machine.
    ///
    /// Returns the drop outcome if this gesture performed a drop.
    pub fn handle<D, G>(
        &mut self,
        doc: &mut D,
        geometry: &G,
        gesture: Gesture<P::Element>,
    ) -> Option<DropOutcome>
    where
        D: EditorDocument,
        G: PositionGeometry + ?Sized,
    {
        let Gesture {
            phase,
            modality,
            point,
        } = gesture;
        match phase {
            GesturePhase::Start(origin) => {
                self.start(origin, modality, point);
                None
            }
            GesturePhase::Move => {
                self.move_to(modality, point);
                None
            }
            GesturePhase::Drop => self.complete_drop(doc, geometry, modality, point),
            GesturePhase::End => self.end(doc, geometry, modality, point),
            GesturePhase::Cancel => {
                self.cancel(modality);
                None
            }
        }
    }

    /// Begin a session. Returns false if the start was ignored.
    pub fn start(&mut self, origin: DragOrigin<P::Element>, modality: Modality, point: Point) -> bool {
        if self.label_edit.is_some() {
            tracing::debug!("drag start ignored: label edit in progress");
            return false;
        }
        if self.session.is_some() {
            tracing::debug!(?modality, "drag start ignored: session already active");
            return false;
        }

        self.platform.mark_dragging(origin.element(), true);
        let feedback = match modality {
            Modality::Touch => self.platform.spawn_feedback(origin.element(), point),
            Modality::Mouse => None,
        };
        tracing::debug!(?modality, text = %origin.text(), "drag started");
        self.session = Some(Session {
            origin,
            modality,
            feedback,
            dropped: false,
        });
        true
    }

    /// Pointer moved during a session.
    pub fn move_to(&mut self, modality: Modality, point: Point) {
        let Some(session) = self.session.as_ref().filter(|s| s.modality == modality) else {
            return;
        };
        if let Some(feedback) = &session.feedback {
            self.platform.move_feedback(feedback, point);
        }
        if matches!(session.origin, DragOrigin::Chip { .. }) {
            let inside = trash::is_inside(self.platform.trash_bounds(), point);
            if let Some(hover) = self.trash.update(inside) {
                self.platform.set_trash_hover(hover);
            }
        }
    }

    /// Run the drop for the active session, at most once.
    ///
    /// The session stays active so the following `End` can clean it up.
    pub fn complete_drop<D, G>(
        &mut self,
        doc: &mut D,
        geometry: &G,
        modality: Modality,
        point: Point,
    ) -> Option<DropOutcome>
    where
        D: EditorDocument,
        G: PositionGeometry + ?Sized,
    {
        let session = self.session.as_mut().filter(|s| s.modality == modality)?;
        if session.dropped {
            tracing::debug!("drop ignored: session already dropped");
            return None;
        }
        session.dropped = true;
        let origin = session.origin.clone();

        if let Some(hover) = self.trash.clear() {
            self.platform.set_trash_hover(hover);
        }

        let outcome = self.perform_drop(doc, geometry, &origin, point);
        tracing::debug!(?outcome, "drop completed");
        Some(outcome)
    }

    fn perform_drop<D, G>(
        &self,
        doc: &mut D,
        geometry: &G,
        origin: &DragOrigin<P::Element>,
        point: Point,
    ) -> DropOutcome
    where
        D: EditorDocument,
        G: PositionGeometry + ?Sized,
    {
        let over_trash = trash::is_inside(self.platform.trash_bounds(), point);
        let over_document = self
            .platform
            .document_bounds()
            .is_some_and(|r| r.contains(point));

        let edit = match origin {
            DragOrigin::Palette { .. } if over_trash => return DropOutcome::Cancelled,
            DragOrigin::Chip { element, text } if over_trash => {
                let Some(pos) = self.platform.chip_position(element) else {
                    return detached(text);
                };
                Edit::Delete {
                    chip: ChipRef::new(pos, text.clone()),
                }
            }
            _ if !over_document => return DropOutcome::Cancelled,
            origin => {
                let Some(target) = resolve_drop_position(doc.doc(), geometry, point) else {
                    return DropOutcome::NotHandled;
                };
                match origin {
                    DragOrigin::Palette { text, .. } => Edit::InsertNew {
                        pos: target,
                        text: text.clone(),
                    },
                    DragOrigin::Chip { element, text } => {
                        let Some(pos) = self.platform.chip_position(element) else {
                            return detached(text);
                        };
                        Edit::Relocate {
                            chip: ChipRef::new(pos, text.clone()),
                            target,
                        }
                    }
                }
            }
        };

        match apply_edit(doc, &edit, self.options) {
            Ok(outcome) => DropOutcome::Applied(outcome),
            Err(err) => DropOutcome::Rejected(err),
        }
    }

    /// Finish the session. Touch drops here if it has not dropped yet.
    pub fn end<D, G>(
        &mut self,
        doc: &mut D,
        geometry: &G,
        modality: Modality,
        point: Point,
    ) -> Option<DropOutcome>
    where
        D: EditorDocument,
        G: PositionGeometry + ?Sized,
    {
        if self.modality() != Some(modality) {
            return None;
        }
        let outcome = match modality {
            Modality::Touch => self.complete_drop(doc, geometry, modality, point),
            Modality::Mouse => None,
        };
        self.cleanup();
        outcome
    }

    /// Abandon the session without dropping.
    pub fn cancel(&mut self, modality: Modality) {
        if self.modality() == Some(modality) {
            tracing::debug!(?modality, "drag cancelled");
            self.cleanup();
        }
    }

    /// Tear down the session whatever its modality. Used when the host
    /// unmounts mid-drag.
    pub fn reset(&mut self) {
        self.cleanup();
    }

    fn cleanup(&mut self) {
        if let Some(session) = self.session.take() {
            if let Some(feedback) = session.feedback {
                self.platform.remove_feedback(feedback);
            }
            self.platform.mark_dragging(session.origin.element(), false);
        }
        if let Some(hover) = self.trash.clear() {
            self.platform.set_trash_hover(hover);
        }
    }

    // === Label editing ===

    pub fn is_label_editing(&self) -> bool {
        self.label_edit.is_some()
    }

    /// Open a label edit for `chip`. Only allowed while idle.
    pub fn begin_label_edit(&mut self, chip: ChipRef) -> bool {
        if self.session.is_some() || self.label_edit.is_some() {
            tracing::debug!(?chip, "label edit refused: input busy");
            return false;
        }
        self.label_edit = Some(LabelEdit::new(chip));
        true
    }

    /// Close the open label edit with the prompt's answer.
    ///
    /// The input hold is released whatever the answer. Returns `None` if no
    /// label edit was open.
    pub fn finish_label_edit<D: EditorDocument>(
        &mut self,
        doc: &mut D,
        answer: Option<&str>,
    ) -> Option<Result<EditOutcome, EditError>> {
        let edit = self.label_edit.take()?;
        Some(edit.finish(doc, answer))
    }
}

impl<P: DragPlatform> Drop for DragController<P> {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::document::LocalEditor;
    use crate::node::{Document, Inline, Paragraph};
    use crate::resolve::tests::LinearGeometry;
    use crate::types::Rect;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Mark(u32, bool),
        Spawn(u32),
        MoveFeedback(u32),
        Remove(u32),
        Hover(bool),
    }

    /// Records platform calls. Document spans x in 0..=100, trash is at
    /// x 200..=250.
    #[derive(Default)]
    struct MockPlatform {
        calls: RefCell<Vec<Call>>,
        live_feedback: RefCell<Vec<u32>>,
        chip_positions: RefCell<HashMap<u32, usize>>,
    }

    impl MockPlatform {
        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn place_chip(&self, element: u32, pos: usize) {
            self.chip_positions.borrow_mut().insert(element, pos);
        }
    }

    impl DragPlatform for &MockPlatform {
        type Element = u32;
        type Feedback = u32;

        fn mark_dragging(&self, element: &u32, dragging: bool) {
            self.calls.borrow_mut().push(Call::Mark(*element, dragging));
        }

        fn spawn_feedback(&self, element: &u32, _point: Point) -> Option<u32> {
            self.calls.borrow_mut().push(Call::Spawn(*element));
            self.live_feedback.borrow_mut().push(*element);
            Some(*element)
        }

        fn move_feedback(&self, feedback: &u32, _point: Point) {
            self.calls.borrow_mut().push(Call::MoveFeedback(*feedback));
        }

        fn remove_feedback(&self, feedback: u32) {
            self.calls.borrow_mut().push(Call::Remove(feedback));
            self.live_feedback.borrow_mut().retain(|f| *f != feedback);
        }

        fn set_trash_hover(&self, hover: bool) {
            self.calls.borrow_mut().push(Call::Hover(hover));
        }

        fn trash_bounds(&self) -> Option<Rect> {
            Some(Rect::new(200.0, 0.0, 50.0, 50.0))
        }

        fn document_bounds(&self) -> Option<Rect> {
            Some(Rect::new(0.0, 0.0, 100.0, 20.0))
        }

        fn chip_position(&self, element: &u32) -> Option<usize> {
            self.chip_positions.borrow().get(element).copied()
        }
    }

    fn editor(texts: &[&str]) -> LocalEditor {
        let doc = Document::new(vec![Paragraph::new(
            texts.iter().map(|t| Inline::chip(t)).collect(),
        )]);
        LocalEditor::with_document(doc, 100)
    }

    fn at(x: f64) -> Point {
        Point::new(x, 5.0)
    }

    fn palette(element: u32, text: &str) -> GesturePhase<u32> {
        GesturePhase::Start(DragOrigin::Palette {
            element,
            text: text.into(),
        })
    }

    fn chip(element: u32, text: &str) -> GesturePhase<u32> {
        GesturePhase::Start(DragOrigin::Chip {
            element,
            text: text.into(),
        })
    }

    fn mouse(phase: GesturePhase<u32>, x: f64) -> Gesture<u32> {
        Gesture::new(phase, Modality::Mouse, at(x))
    }

    fn touch(phase: GesturePhase<u32>, x: f64) -> Gesture<u32> {
        Gesture::new(phase, Modality::Touch, at(x))
    }

    #[test]
    fn test_mouse_palette_drop_into_empty_document() {
        let platform = MockPlatform::default();
        let mut ctl = DragController::new(&platform, MutatorOptions::default());
        let mut ed = editor(&[]);

        assert_eq!(ctl.handle(&mut ed, &LinearGeometry, mouse(palette(7, "Happy"), 0.0)), None);
        assert_eq!(ctl.state(), DragState::DraggingPaletteItem);

        let outcome = ctl.handle(&mut ed, &LinearGeometry, mouse(GesturePhase::Drop, 2.0));
        assert_eq!(outcome, Some(DropOutcome::Applied(EditOutcome::Inserted { pos: 1 })));
        // Drop does not end the session.
        assert_eq!(ctl.state(), DragState::DraggingPaletteItem);

        assert_eq!(ctl.handle(&mut ed, &LinearGeometry, mouse(GesturePhase::End, 2.0)), None);
        assert!(ctl.is_idle());
        assert_eq!(ed.doc().chip_texts(), vec!["Happy"]);
        assert_eq!(ed.doc().paragraphs().len(), 1);
        assert_eq!(platform.calls(), vec![Call::Mark(7, true), Call::Mark(7, false)]);
    }

    #[test]
    fn test_mouse_end_without_drop_is_cancellation() {
        let platform = MockPlatform::default();
        let mut ctl = DragController::new(&platform, MutatorOptions::default());
        let mut ed = editor(&[]);

        ctl.handle(&mut ed, &LinearGeometry, mouse(palette(1, "Happy"), 0.0));
        assert_eq!(ctl.handle(&mut ed, &LinearGeometry, mouse(GesturePhase::End, 1.0)), None);
        assert!(ctl.is_idle());
        assert_eq!(ed.doc(), &Document::default());
    }

    #[test]
    fn test_drop_runs_once() {
        let platform = MockPlatform::default();
        let mut ctl = DragController::new(&platform, MutatorOptions::default());
        let mut ed = editor(&[]);

        ctl.handle(&mut ed, &LinearGeometry, mouse(palette(1, "Happy"), 0.0));
        assert!(ctl.handle(&mut ed, &LinearGeometry, mouse(GesturePhase::Drop, 1.0)).is_some());
        assert_eq!(ctl.handle(&mut ed, &LinearGeometry, mouse(GesturePhase::Drop, 1.0)), None);
        ctl.handle(&mut ed, &LinearGeometry, mouse(GesturePhase::End, 1.0));
        assert_eq!(ed.doc().chip_count(), 1);
    }

    #[test]
    fn test_relocate_chip_after_next() {
        let platform = MockPlatform::default();
        platform.place_chip(10, 1);
        let mut ctl = DragController::new(&platform, MutatorOptions::default());
        let mut ed = editor(&["Happy", "Sunny"]);

        ctl.handle(&mut ed, &LinearGeometry, mouse(chip(10, "Happy"), 1.0));
        assert_eq!(ctl.state(), DragState::DraggingDocumentChip);
        let outcome = ctl.handle(&mut ed, &LinearGeometry, mouse(GesturePhase::Drop, 3.0));
        assert_eq!(
            outcome,
            Some(DropOutcome::Applied(EditOutcome::Moved { from: 1, to: 2 }))
        );
        ctl.handle(&mut ed, &LinearGeometry, mouse(GesturePhase::End, 3.0));
        assert_eq!(ed.doc().chip_texts(), vec!["Sunny", "Happy"]);
    }

    #[test]
    fn test_trash_deletes_only_that_chip() {
        let platform = MockPlatform::default();
        platform.place_chip(11, 2);
        let mut ctl = DragController::new(&platform, MutatorOptions::default());
        let mut ed = editor(&["Happy", "Sunny", "Gentle"]);

        ctl.handle(&mut ed, &LinearGeometry, mouse(chip(11, "Sunny"), 2.0));
        ctl.handle(&mut ed, &LinearGeometry, mouse(GesturePhase::Move, 220.0));
        assert!(ctl.is_trash_hovered());
        let outcome = ctl.handle(&mut ed, &LinearGeometry, mouse(GesturePhase::Drop, 220.0));
        assert_eq!(outcome, Some(DropOutcome::Applied(EditOutcome::Deleted { pos: 2 })));
        assert!(!ctl.is_trash_hovered());
        ctl.handle(&mut ed, &LinearGeometry, mouse(GesturePhase::End, 220.0));

        assert_eq!(ed.doc().chip_texts(), vec!["Happy", "Gentle"]);
        assert_eq!(
            platform.calls(),
            vec![
                Call::Mark(11, true),
                Call::Hover(true),
                Call::Hover(false),
                Call::Mark(11, false)
            ]
        );
    }

    #[test]
    fn test_trash_only_chip_leaves_empty_paragraph() {
        let platform = MockPlatform::default();
        platform.place_chip(3, 1);
        let mut ctl = DragController::new(&platform, MutatorOptions::default());
        let mut ed = editor(&["Happy"]);

        ctl.handle(&mut ed, &LinearGeometry, touch(chip(3, "Happy"), 1.0));
        ctl.handle(&mut ed, &LinearGeometry, touch(GesturePhase::Move, 250.0));
        let outcome = ctl.handle(&mut ed, &LinearGeometry, touch(GesturePhase::End, 250.0));
        assert_eq!(outcome, Some(DropOutcome::Applied(EditOutcome::Deleted { pos: 1 })));
        assert_eq!(ed.doc(), &Document::default());
        assert!(platform.live_feedback.borrow().is_empty());
    }

    #[test]
    fn test_palette_over_trash_is_cancelled() {
        let platform = MockPlatform::default();
        let mut ctl = DragController::new(&platform, MutatorOptions::default());
        let mut ed = editor(&["Happy"]);

        ctl.handle(&mut ed, &LinearGeometry, mouse(palette(1, "Sunny"), 0.0));
        ctl.handle(&mut ed, &LinearGeometry, mouse(GesturePhase::Move, 220.0));
        // Palette items never light up the trash.
        assert!(!ctl.is_trash_hovered());
        let outcome = ctl.handle(&mut ed, &LinearGeometry, mouse(GesturePhase::Drop, 220.0));
        assert_eq!(outcome, Some(DropOutcome::Cancelled));
        assert_eq!(ed.doc().chip_texts(), vec!["Happy"]);
    }

    #[test]
    fn test_release_outside_everything_changes_nothing() {
        let platform = MockPlatform::default();
        platform.place_chip(4, 1);
        let mut ctl = DragController::new(&platform, MutatorOptions::default());
        let mut ed = editor(&["Happy"]);
        let before = ed.doc().clone();

        ctl.handle(&mut ed, &LinearGeometry, touch(chip(4, "Happy"), 1.0));
        let outcome = ctl.handle(&mut ed, &LinearGeometry, touch(GesturePhase::End, 150.0));
        assert_eq!(outcome, Some(DropOutcome::Cancelled));
        assert_eq!(ed.doc(), &before);
        assert!(ctl.is_idle());
        assert!(!ed.can_undo());
    }

    #[test]
    fn test_unresolvable_point_not_handled() {
        let platform = MockPlatform::default();
        let mut ctl = DragController::new(&platform, MutatorOptions::default());
        let mut ed = editor(&[]);

        ctl.handle(&mut ed, &NoGeometry, mouse(palette(1, "Happy"), 0.0));
        let outcome = ctl.handle(&mut ed, &NoGeometry, mouse(GesturePhase::Drop, 5.0));
        assert_eq!(outcome, Some(DropOutcome::NotHandled));
        assert!(!outcome.is_some_and(|o| o.is_handled()));
        ctl.handle(&mut ed, &NoGeometry, mouse(GesturePhase::End, 5.0));
        assert!(ctl.is_idle());
        assert_eq!(ed.doc(), &Document::default());
    }

    struct NoGeometry;

    impl PositionGeometry for NoGeometry {
        fn pos_at_coords(&self, _point: Point) -> Option<usize> {
            None
        }

        fn coords_at_pos(&self, _pos: usize) -> Option<Rect> {
            None
        }
    }

    #[test]
    fn test_stale_chip_rejected() {
        let platform = MockPlatform::default();
        // The element claims position 2, but the chip there is "Sunny".
        platform.place_chip(5, 2);
        let mut ctl = DragController::new(&platform, MutatorOptions::default());
        let mut ed = editor(&["Happy", "Sunny"]);

        ctl.handle(&mut ed, &LinearGeometry, mouse(chip(5, "Happy"), 1.0));
        let outcome = ctl.handle(&mut ed, &LinearGeometry, mouse(GesturePhase::Drop, 220.0));
        assert!(matches!(
            outcome,
            Some(DropOutcome::Rejected(EditError::StaleChip { pos: 2, .. }))
        ));
        // A rejected drop is still consumed, so the host never applies its own.
        assert!(outcome.is_some_and(|o| o.is_handled()));
        assert_eq!(ed.doc().chip_texts(), vec!["Happy", "Sunny"]);
    }

    #[test]
    fn test_detached_chip_rejected_and_consumed() {
        let platform = MockPlatform::default();
        let mut ctl = DragController::new(&platform, MutatorOptions::default());
        let mut ed = editor(&["Happy"]);
        let before = ed.doc().clone();

        // Element 9 was never placed: the chip left the page mid-drag.
        ctl.handle(&mut ed, &LinearGeometry, mouse(chip(9, "Happy"), 1.0));
        let outcome = ctl.handle(&mut ed, &LinearGeometry, mouse(GesturePhase::Drop, 2.0));
        assert!(matches!(
            outcome,
            Some(DropOutcome::Rejected(EditError::DetachedChip { .. }))
        ));
        assert!(outcome.is_some_and(|o| o.is_handled()));
        assert_eq!(ed.doc(), &before);
        assert!(!ed.can_undo());
    }

    #[test]
    fn test_touch_feedback_lifecycle() {
        let platform = MockPlatform::default();
        let mut ctl = DragController::new(&platform, MutatorOptions::default());
        let mut ed = editor(&[]);

        ctl.handle(&mut ed, &LinearGeometry, touch(palette(2, "Sunny"), 0.0));
        assert_eq!(*platform.live_feedback.borrow(), vec![2]);
        ctl.handle(&mut ed, &LinearGeometry, touch(GesturePhase::Move, 50.0));
        ctl.handle(&mut ed, &LinearGeometry, touch(GesturePhase::Move, 1.0));
        let outcome = ctl.handle(&mut ed, &LinearGeometry, touch(GesturePhase::End, 1.0));

        assert_eq!(outcome, Some(DropOutcome::Applied(EditOutcome::Inserted { pos: 1 })));
        assert!(platform.live_feedback.borrow().is_empty());
        assert!(ctl.is_idle());
        assert_eq!(
            platform.calls(),
            vec![
                Call::Mark(2, true),
                Call::Spawn(2),
                Call::MoveFeedback(2),
                Call::MoveFeedback(2),
                Call::Remove(2),
                Call::Mark(2, false)
            ]
        );
    }

    #[test]
    fn test_touch_cancel_cleans_up() {
        let platform = MockPlatform::default();
        platform.place_chip(9, 1);
        let mut ctl = DragController::new(&platform, MutatorOptions::default());
        let mut ed = editor(&["Happy"]);

        ctl.handle(&mut ed, &LinearGeometry, touch(chip(9, "Happy"), 1.0));
        ctl.handle(&mut ed, &LinearGeometry, touch(GesturePhase::Move, 210.0));
        assert!(ctl.is_trash_hovered());
        ctl.handle(&mut ed, &LinearGeometry, touch(GesturePhase::Cancel, 210.0));

        assert!(ctl.is_idle());
        assert!(!ctl.is_trash_hovered());
        assert!(platform.live_feedback.borrow().is_empty());
        assert_eq!(ed.doc().chip_texts(), vec!["Happy"]);
    }

    #[test]
    fn test_nested_start_and_other_modality_ignored() {
        let platform = MockPlatform::default();
        let mut ctl = DragController::new(&platform, MutatorOptions::default());
        let mut ed = editor(&[]);

        ctl.handle(&mut ed, &LinearGeometry, touch(palette(1, "Happy"), 0.0));
        assert!(!ctl.start(
            DragOrigin::Palette {
                element: 2,
                text: "Sunny".into()
            },
            Modality::Mouse,
            at(0.0)
        ));
        assert_eq!(ctl.subject_text().map(|t| t.as_str()), Some("Happy"));

        // Mouse events during a touch session do nothing.
        assert_eq!(ctl.handle(&mut ed, &LinearGeometry, mouse(GesturePhase::Drop, 1.0)), None);
        assert_eq!(ctl.handle(&mut ed, &LinearGeometry, mouse(GesturePhase::End, 1.0)), None);
        ctl.handle(&mut ed, &LinearGeometry, mouse(GesturePhase::Cancel, 1.0));
        assert_eq!(ctl.modality(), Some(Modality::Touch));
        assert_eq!(ed.doc().chip_count(), 0);

        ctl.handle(&mut ed, &LinearGeometry, touch(GesturePhase::End, 1.0));
        assert_eq!(ed.doc().chip_texts(), vec!["Happy"]);
    }

    #[test]
    fn test_label_edit_blocks_drag() {
        let platform = MockPlatform::default();
        let mut ctl = DragController::new(&platform, MutatorOptions::default());
        let mut ed = editor(&["Happy"]);

        assert!(ctl.begin_label_edit(ChipRef::new(1, "Happy")));
        assert!(ctl.is_label_editing());
        assert!(!ctl.start(
            DragOrigin::Palette {
                element: 1,
                text: "Sunny".into()
            },
            Modality::Mouse,
            at(0.0)
        ));

        let result = ctl.finish_label_edit(&mut ed, Some("Bright"));
        assert_eq!(result, Some(Ok(EditOutcome::Relabeled { pos: 1 })));
        assert!(!ctl.is_label_editing());
        assert_eq!(ed.doc().chip_texts(), vec!["Bright"]);
        assert_eq!(ctl.finish_label_edit(&mut ed, None), None);

        // Lock released on dismissal as well.
        assert!(ctl.begin_label_edit(ChipRef::new(1, "Bright")));
        assert_eq!(ctl.finish_label_edit(&mut ed, None), Some(Ok(EditOutcome::Unchanged)));
        assert!(ctl.start(
            DragOrigin::Palette {
                element: 1,
                text: "Sunny".into()
            },
            Modality::Mouse,
            at(0.0)
        ));
        // And no label edit can open mid-drag.
        assert!(!ctl.begin_label_edit(ChipRef::new(1, "Bright")));
    }

    #[test]
    fn test_dropping_controller_removes_feedback() {
        let platform = MockPlatform::default();
        {
            let mut ctl = DragController::new(&platform, MutatorOptions::default());
            ctl.start(
                DragOrigin::Palette {
                    element: 1,
                    text: "Happy".into(),
                },
                Modality::Touch,
                at(0.0),
            );
        }
        assert!(platform.live_feedback.borrow().is_empty());
    }
}
