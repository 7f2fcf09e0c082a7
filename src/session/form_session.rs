//! Form session lifecycle and operations

use crate::definition::{FieldDescriptor, FormDefinition};
use crate::error::{save_error_message, ConfigError};
use crate::field::{Field, FieldMap, FieldValue, FieldView};
use crate::validate::{self, Trigger};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Notification shown when a save succeeds and the definition carries no
/// custom success message
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Saved successfully";

/// Arbitrary keyed object seeding field values; any key matching a field
/// name seeds that field
pub type InitialValues = serde_json::Map<String, serde_json::Value>;

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No field has been edited or blurred yet
    #[default]
    Pristine,
    /// At least one field is dirty or touched
    Editing,
    /// A save is in flight
    Submitting,
    /// The last submit attempt finished
    Settled(SettleOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    Success,
    Error,
}

/// What a submit attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the save was not attempted
    Invalid,
    /// Nothing differed from the initial values; the save was skipped
    NoChanges,
    /// The save ran and succeeded
    Saved,
}

/// Caller-supplied asynchronous save operation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SaveHandler<R: Send + 'static>: Send + Sync {
    async fn save(&mut self, request: R) -> Result<()>;
}

/// Toast-style settle notifications. A collaborator seam for the host;
/// the engine only needs "notify success" / "surface error" hooks.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send {
    fn notify_success(&mut self, message: &str);
    fn notify_error(&mut self, message: &str);
}

/// The live, mutable collection of fields plus orchestration operations
/// for one rendered form instance.
///
/// All mutation runs synchronously on the caller's thread; the only
/// asynchronous operation is the save driven from [`FormSession::submit`].
/// `submit` takes `&mut self`, so overlapping saves on one session are
/// unrepresentable.
pub struct FormSession {
    definition: FormDefinition,
    fields: FieldMap,
    initial_values: InitialValues,
    identity: Uuid,
    phase: SessionPhase,
    form_error: Option<String>,
}

impl FormSession {
    /// Create a session from a definition and an initial-values object.
    /// The definition's cross-field references are resolved here, so a
    /// mismatched definition fails before any field exists.
    pub fn new(
        definition: FormDefinition,
        initial_values: InitialValues,
    ) -> Result<Self, ConfigError> {
        definition.validate()?;
        let fields: FieldMap = definition
            .fields()
            .map(|descriptor| {
                let value = seed_value(descriptor, &initial_values);
                (
                    descriptor.name.clone(),
                    Field::new(
                        &descriptor.name,
                        &descriptor.label,
                        descriptor.kind,
                        value,
                        descriptor.validators.clone(),
                        descriptor.dependent_fields.clone(),
                    ),
                )
            })
            .collect();
        Ok(Self {
            definition,
            fields,
            initial_values,
            identity: Uuid::new_v4(),
            phase: SessionPhase::Pristine,
            form_error: None,
        })
    }

    /// Session identity; regenerated on reset so hosts keying rendered
    /// subtrees off it discard stale uncontrolled state
    pub fn identity(&self) -> Uuid {
        self.identity
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Form-level error from the last failed save, if any
    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    /// True iff no field carries a defined error
    pub fn is_valid(&self) -> bool {
        validate::is_valid(&self.fields)
    }

    /// True when any field's value differs from its initialization
    /// baseline. Drives the submit no-op decision.
    pub fn has_changes(&self) -> bool {
        self.fields.values().any(|f| f.is_modified())
    }

    pub fn field(&self, name: &str) -> Result<&Field, ConfigError> {
        self.fields
            .get(name)
            .ok_or_else(|| ConfigError::UnknownField(name.to_string()))
    }

    /// Fields in declared order
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Read-only snapshots for presentation adapters, in declared order
    pub fn field_views(&self) -> Vec<FieldView> {
        self.fields.values().map(Field::view).collect()
    }

    /// Update a field's value from an input event. Marks the field dirty
    /// when the value differs from its baseline, marks it touched, and
    /// runs a change-triggered validation pass (which only ever clears
    /// errors) plus the dependent cascade.
    pub fn handle_change(&mut self, name: &str, value: FieldValue) -> Result<(), ConfigError> {
        let field = self
            .fields
            .get_mut(name)
            .ok_or_else(|| ConfigError::UnknownField(name.to_string()))?;
        field.set_value(value);
        validate::validate_field(&mut self.fields, name, Trigger::Change)?;
        self.mark_editing();
        Ok(())
    }

    /// Mark a field touched on focus loss and run a blur-triggered
    /// validation pass over it and its dependents
    pub fn handle_blur(&mut self, name: &str) -> Result<(), ConfigError> {
        let field = self
            .fields
            .get_mut(name)
            .ok_or_else(|| ConfigError::UnknownField(name.to_string()))?;
        field.touched = true;
        validate::validate_field(&mut self.fields, name, Trigger::Blur)?;
        self.mark_editing();
        Ok(())
    }

    /// A new interaction returns a pristine or settled session to editing
    fn mark_editing(&mut self) {
        if matches!(
            self.phase,
            SessionPhase::Pristine | SessionPhase::Settled(_)
        ) {
            self.phase = SessionPhase::Editing;
        }
    }

    /// Run a whole-form validation pass with blur semantics and report
    /// aggregate validity. Hosts may call this opportunistically when
    /// focus leaves the form to refresh outstanding errors without
    /// waiting for a submit attempt; fields stay exempt from eager
    /// error display until they are dirty or touched.
    pub fn validate_all(&mut self) -> Result<bool, ConfigError> {
        validate::validate_form(&mut self.fields, Trigger::Blur)?;
        Ok(self.is_valid())
    }

    /// Submit the form.
    ///
    /// Builds the request from the current field values, runs whole-form
    /// validation (force-touching every field), and then either:
    /// skips the save when nothing changed, or drives the save handler
    /// and surfaces the settle outcome through the notifier. A failed
    /// save records its extracted message in the form-level error slot
    /// and propagates the error to the caller; field state is preserved
    /// so the user can retry without re-entering data.
    pub async fn submit<R, F, S, N>(
        &mut self,
        build_request: F,
        save: &mut S,
        notifier: &mut N,
    ) -> Result<SubmitOutcome>
    where
        R: Send + 'static,
        F: FnOnce(&FieldMap) -> R,
        S: SaveHandler<R> + ?Sized,
        N: Notifier + ?Sized,
    {
        let had_changes = self.has_changes();
        let request = build_request(&self.fields);

        validate::validate_form(&mut self.fields, Trigger::Submit)?;
        if !self.is_valid() {
            tracing::debug!(
                form = self.definition.short_name.as_deref().unwrap_or("form"),
                "submit blocked by validation errors"
            );
            self.phase = SessionPhase::Editing;
            return Ok(SubmitOutcome::Invalid);
        }

        if !had_changes {
            // nothing differs from the initial values; skip the redundant write
            tracing::debug!(
                form = self.definition.short_name.as_deref().unwrap_or("form"),
                "submit with no changes, save skipped"
            );
            self.phase = SessionPhase::Settled(SettleOutcome::Success);
            return Ok(SubmitOutcome::NoChanges);
        }

        self.phase = SessionPhase::Submitting;
        self.form_error = None;

        match save.save(request).await {
            Ok(()) => {
                let message = self
                    .definition
                    .success_message
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());
                notifier.notify_success(&message);
                self.phase = SessionPhase::Settled(SettleOutcome::Success);
                tracing::info!(
                    form = self.definition.short_name.as_deref().unwrap_or("form"),
                    "save succeeded"
                );
                Ok(SubmitOutcome::Saved)
            }
            Err(err) => {
                let message = save_error_message(&err);
                notifier.notify_error(&message);
                self.form_error = Some(message);
                self.phase = SessionPhase::Settled(SettleOutcome::Error);
                tracing::warn!(
                    form = self.definition.short_name.as_deref().unwrap_or("form"),
                    error = %err,
                    "save failed"
                );
                Err(err)
            }
        }
    }

    /// Restore every field to its pristine state with values from the
    /// (possibly updated) initial-values object, and assign a fresh
    /// session identity so hosts fully remount keyed render state.
    pub fn reset(&mut self) {
        let seeds: Vec<(String, FieldValue)> = self
            .definition
            .fields()
            .map(|d| (d.name.clone(), seed_value(d, &self.initial_values)))
            .collect();
        for (name, value) in seeds {
            if let Some(field) = self.fields.get_mut(&name) {
                field.rebaseline(value);
            }
        }
        self.identity = Uuid::new_v4();
        self.phase = SessionPhase::Pristine;
        self.form_error = None;
        tracing::debug!(session = %self.identity, "form reset");
    }

    /// Adopt a new initial-values object, e.g. after the host finishes an
    /// asynchronous load of default values. Values are copied only into
    /// fields that are neither dirty nor touched; a field the user has
    /// started interacting with is never stomped.
    pub fn reinitialize(&mut self, initial_values: InitialValues) {
        self.initial_values = initial_values;
        let seeds: Vec<(String, FieldValue)> = self
            .definition
            .fields()
            .map(|d| (d.name.clone(), seed_value(d, &self.initial_values)))
            .collect();
        for (name, value) in seeds {
            if let Some(field) = self.fields.get_mut(&name) {
                if field.is_pristine() {
                    field.rebaseline(value);
                }
            }
        }
    }
}

/// Value a field starts with: the matching initial-values entry when one
/// seeds it, otherwise the default for its control kind
fn seed_value(descriptor: &FieldDescriptor, initial_values: &InitialValues) -> FieldValue {
    initial_values
        .get(&descriptor.name)
        .and_then(FieldValue::from_json)
        .unwrap_or_else(|| descriptor.kind.default_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{FieldDescriptor, FieldGroup};
    use crate::error::SaveRejection;
    use crate::field::FieldKind;
    use crate::validate::ValidatorSpec;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    struct IntakeRequest {
        title: String,
        contact: String,
    }

    fn intake_definition() -> FormDefinition {
        FormDefinition::new(vec![FieldGroup::new(vec![
            FieldDescriptor::new("title", "Title", FieldKind::Text)
                .with_validator(ValidatorSpec::required()),
            FieldDescriptor::new("contact", "Contact Email", FieldKind::Text)
                .with_validator(ValidatorSpec::email()),
        ])])
        .unwrap()
        .with_short_name("intake")
    }

    fn initial(title: &str, contact: &str) -> InitialValues {
        let mut values = InitialValues::new();
        values.insert("title".to_string(), json!(title));
        values.insert("contact".to_string(), json!(contact));
        values
    }

    fn build_request(fields: &FieldMap) -> IntakeRequest {
        IntakeRequest {
            title: fields["title"].value.as_text().to_string(),
            contact: fields["contact"].value.as_text().to_string(),
        }
    }

    fn session() -> FormSession {
        FormSession::new(intake_definition(), initial("Hello", "a@b.com")).unwrap()
    }

    fn field_snapshot(session: &FormSession) -> Vec<(String, FieldValue, bool, bool, bool)> {
        session
            .fields()
            .map(|f| {
                (
                    f.name.clone(),
                    f.value.clone(),
                    f.dirty(),
                    f.touched(),
                    f.error().is_some(),
                )
            })
            .collect()
    }

    mod lifecycle {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_new_session_is_pristine_and_seeded() {
            let session = session();
            assert_eq!(session.phase(), SessionPhase::Pristine);
            assert_eq!(
                session.field("title").unwrap().value,
                FieldValue::text("Hello")
            );
            assert!(!session.has_changes());
        }

        #[test]
        fn test_change_moves_to_editing() {
            let mut session = session();
            session
                .handle_change("title", FieldValue::text("Hi"))
                .unwrap();
            assert_eq!(session.phase(), SessionPhase::Editing);
            assert!(session.has_changes());
        }

        #[test]
        fn test_blur_alone_moves_to_editing() {
            let mut session = session();
            session.handle_blur("title").unwrap();
            assert_eq!(session.phase(), SessionPhase::Editing);
            assert!(!session.has_changes());
        }

        #[test]
        fn test_unknown_field_is_a_config_error() {
            let mut session = session();
            let err = session
                .handle_change("ghost", FieldValue::text("x"))
                .unwrap_err();
            assert_eq!(err, ConfigError::UnknownField("ghost".to_string()));
        }

        #[tokio::test]
        async fn test_editing_after_settle_leaves_the_settled_phase() {
            let mut session = session();
            session
                .handle_change("title", FieldValue::text("Changed"))
                .unwrap();

            let mut save = MockSaveHandler::<IntakeRequest>::new();
            save.expect_save().times(1).returning(|_| Ok(()));
            let mut notifier = MockNotifier::new();
            notifier.expect_notify_success().times(1).return_const(());
            session
                .submit(build_request, &mut save, &mut notifier)
                .await
                .unwrap();
            assert_eq!(session.phase(), SessionPhase::Settled(SettleOutcome::Success));

            session
                .handle_change("title", FieldValue::text("Changed again"))
                .unwrap();
            assert_eq!(session.phase(), SessionPhase::Editing);
        }
    }

    mod reset {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_reset_is_idempotent() {
            let mut session = session();
            session
                .handle_change("title", FieldValue::text("Edited"))
                .unwrap();
            session.handle_blur("contact").unwrap();

            session.reset();
            let once = field_snapshot(&session);
            session.reset();
            let twice = field_snapshot(&session);

            assert_eq!(once, twice);
            assert_eq!(session.phase(), SessionPhase::Pristine);
            assert_eq!(
                session.field("title").unwrap().value,
                FieldValue::text("Hello")
            );
        }

        #[test]
        fn test_reset_assigns_fresh_identity() {
            let mut session = session();
            let before = session.identity();
            session.reset();
            assert_ne!(session.identity(), before);
        }

        #[test]
        fn test_reset_uses_updated_initial_values() {
            let mut session = session();
            session.reinitialize(initial("Reloaded", "c@d.com"));
            session
                .handle_change("title", FieldValue::text("Edited"))
                .unwrap();
            session.reset();
            assert_eq!(
                session.field("title").unwrap().value,
                FieldValue::text("Reloaded")
            );
        }
    }

    mod reinitialize {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_touched_field_is_never_stomped() {
            let mut session = session();
            session
                .handle_change("title", FieldValue::text("User typed this"))
                .unwrap();

            session.reinitialize(initial("Loaded later", "late@server.com"));

            // dirty field keeps the user's value
            assert_eq!(
                session.field("title").unwrap().value,
                FieldValue::text("User typed this")
            );
            // pristine field picks up the new initial value
            assert_eq!(
                session.field("contact").unwrap().value,
                FieldValue::text("late@server.com")
            );
        }
    }

    mod validate_all {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_reports_validity_without_forcing_errors_visible() {
            let mut session = FormSession::new(intake_definition(), InitialValues::new()).unwrap();
            let valid = session.validate_all().unwrap();
            assert!(!valid);
            // title fails required, but an untouched field keeps the
            // error out of its rendered view
            assert_eq!(session.field("title").unwrap().error(), Some("Required"));
            assert_eq!(session.field("title").unwrap().visible_error(), None);
        }

        #[test]
        fn test_reports_valid_when_every_field_passes() {
            let mut session = session();
            assert!(session.validate_all().unwrap());
        }
    }

    mod submit {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_valid_dirty_form_saves_and_notifies() {
            let mut session = session();
            session
                .handle_change("title", FieldValue::text("Changed"))
                .unwrap();

            let mut save = MockSaveHandler::<IntakeRequest>::new();
            save.expect_save()
                .withf(|req| req.title == "Changed" && req.contact == "a@b.com")
                .times(1)
                .returning(|_| Ok(()));
            let mut notifier = MockNotifier::new();
            notifier
                .expect_notify_success()
                .withf(|m| m == DEFAULT_SUCCESS_MESSAGE)
                .times(1)
                .return_const(());

            let outcome = session
                .submit(build_request, &mut save, &mut notifier)
                .await
                .unwrap();
            assert_eq!(outcome, SubmitOutcome::Saved);
            assert_eq!(session.phase(), SessionPhase::Settled(SettleOutcome::Success));
        }

        #[tokio::test]
        async fn test_custom_success_message_is_used() {
            let definition = intake_definition().with_success_message("Intake saved!");
            let mut session =
                FormSession::new(definition, initial("Hello", "a@b.com")).unwrap();
            session
                .handle_change("title", FieldValue::text("Changed"))
                .unwrap();

            let mut save = MockSaveHandler::<IntakeRequest>::new();
            save.expect_save().times(1).returning(|_| Ok(()));
            let mut notifier = MockNotifier::new();
            notifier
                .expect_notify_success()
                .withf(|m| m == "Intake saved!")
                .times(1)
                .return_const(());

            session
                .submit(build_request, &mut save, &mut notifier)
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn test_submit_without_changes_skips_the_save() {
            let mut session = session();
            let mut save = MockSaveHandler::<IntakeRequest>::new();
            // no expectation: any save call would panic the test
            let mut notifier = MockNotifier::new();

            let outcome = session
                .submit(build_request, &mut save, &mut notifier)
                .await
                .unwrap();
            assert_eq!(outcome, SubmitOutcome::NoChanges);
            assert_eq!(session.phase(), SessionPhase::Settled(SettleOutcome::Success));
        }

        #[tokio::test]
        async fn test_invalid_form_rejects_without_saving() {
            let mut session = session();
            session
                .handle_change("title", FieldValue::text(""))
                .unwrap();

            let mut save = MockSaveHandler::<IntakeRequest>::new();
            let mut notifier = MockNotifier::new();

            let outcome = session
                .submit(build_request, &mut save, &mut notifier)
                .await
                .unwrap();
            assert_eq!(outcome, SubmitOutcome::Invalid);
            // submit force-touches every field so the error is visible
            assert_eq!(
                session.field("title").unwrap().visible_error(),
                Some("Required")
            );
        }

        #[tokio::test]
        async fn test_failed_save_surfaces_server_message_and_preserves_state() {
            let mut session = session();
            session
                .handle_change("title", FieldValue::text("Changed"))
                .unwrap();

            let mut save = MockSaveHandler::<IntakeRequest>::new();
            save.expect_save().times(1).returning(|_| {
                Err(anyhow::Error::new(SaveRejection::from_content(
                    "Title already in use",
                )))
            });
            let mut notifier = MockNotifier::new();
            notifier
                .expect_notify_error()
                .withf(|m| m == "Title already in use")
                .times(1)
                .return_const(());

            let result = session.submit(build_request, &mut save, &mut notifier).await;
            assert!(result.is_err());
            assert_eq!(session.form_error(), Some("Title already in use"));
            assert_eq!(session.phase(), SessionPhase::Settled(SettleOutcome::Error));
            // user input survives for retry
            assert_eq!(
                session.field("title").unwrap().value,
                FieldValue::text("Changed")
            );
        }
    }

    mod views {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_views_follow_declared_order_and_pristine_rule() {
            let mut session = session();
            session.handle_change("title", FieldValue::text("")).unwrap();
            session.handle_blur("title").unwrap();

            let views = session.field_views();
            assert_eq!(views.len(), 2);
            assert_eq!(views[0].name, "title");
            assert_eq!(views[0].error.as_deref(), Some("Required"));
            assert_eq!(views[1].name, "contact");
            assert_eq!(views[1].error, None);
        }
    }
}
