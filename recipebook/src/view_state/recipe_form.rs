//! Add/edit recipe form.

use tracing::{debug, info, warn};

use crate::domain::{AppResult, Error, RecipeDraft, new_recipe_id};

use super::{AppContext, InFlight, Observable, read_error, write_error};

const LOGIN_REQUIRED: &str = "You must be logged in to perform this action";
const RECIPE_NOT_FOUND: &str = "Recipe not found";

/// Status of the form's load and submit workflows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    /// Editable.
    Idle,
    /// Loading an existing recipe or saving.
    Loading,
    /// The recipe was saved.
    Success,
    /// Loading or saving failed.
    Error {
        /// Message shown above the form.
        message: String,
    },
}

/// State holder behind the add/edit screen.
pub struct RecipeFormState {
    ctx: AppContext,
    draft: Observable<RecipeDraft>,
    current_recipe_id: Observable<Option<String>>,
    status: Observable<FormStatus>,
    in_flight: InFlight,
}

impl RecipeFormState {
    /// Empty form for a new recipe.
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            draft: Observable::default(),
            current_recipe_id: Observable::default(),
            status: Observable::new(FormStatus::Idle),
            in_flight: InFlight::default(),
        }
    }

    /// Current field contents.
    pub fn draft(&self) -> RecipeDraft {
        self.draft.get()
    }

    /// Observable behind [`Self::draft`].
    pub fn observe_draft(&self) -> &Observable<RecipeDraft> {
        &self.draft
    }

    /// Id being edited; `None` when creating.
    pub fn current_recipe_id(&self) -> Option<String> {
        self.current_recipe_id.get()
    }

    /// Current status.
    pub fn status(&self) -> FormStatus {
        self.status.get()
    }

    /// Observable behind [`Self::status`].
    pub fn observe_status(&self) -> &Observable<FormStatus> {
        &self.status
    }

    /// Title field changed.
    pub fn set_title(&self, value: impl Into<String>) {
        let value = value.into();
        self.draft.modify(|draft| draft.title = value);
    }

    /// Ingredients field changed.
    pub fn set_ingredients(&self, value: impl Into<String>) {
        let value = value.into();
        self.draft.modify(|draft| draft.ingredients = value);
    }

    /// Steps field changed.
    pub fn set_steps(&self, value: impl Into<String>) {
        let value = value.into();
        self.draft.modify(|draft| draft.steps = value);
    }

    /// Category picker changed.
    pub fn set_category(&self, value: impl Into<String>) {
        let value = value.into();
        self.draft.modify(|draft| draft.category = value);
    }

    /// Video URL field changed.
    pub fn set_video_url(&self, value: impl Into<String>) {
        let value = value.into();
        self.draft.modify(|draft| draft.video_url = value);
    }

    /// Populate the form from an existing recipe for editing.
    ///
    /// A blank id is ignored. A missing recipe leaves the fields untouched.
    pub async fn load_recipe(&self, id: &str) -> AppResult<()> {
        if id.trim().is_empty() {
            return Ok(());
        }
        let _guard = self.in_flight.begin()?;
        self.status.set(FormStatus::Loading);
        debug!(recipe_id = %id, "loading recipe for edit");
        match self.ctx.recipes.find_by_id(id).await {
            Ok(Some(recipe)) => {
                self.draft.set(RecipeDraft::from_recipe(&recipe));
                self.current_recipe_id.set(Some(recipe_id(&recipe.id, id)));
                self.status.set(FormStatus::Idle);
                Ok(())
            }
            Ok(None) => self.fail(Error::not_found(RECIPE_NOT_FOUND)),
            Err(err) => self.fail(read_error(err)),
        }
    }

    /// Validate the form and write the recipe in full.
    pub async fn submit_recipe(&self) -> AppResult<()> {
        let _guard = self.in_flight.begin()?;
        let Some(session) = self.ctx.session() else {
            return self.fail(Error::unauthorized(LOGIN_REQUIRED));
        };
        let draft = self.draft.get();
        if let Err(err) = draft.validate() {
            return self.fail(Error::invalid_request(err.to_string()));
        }
        self.status.set(FormStatus::Loading);
        let id = self.current_recipe_id.get().unwrap_or_else(new_recipe_id);
        let recipe = draft.to_recipe(id, &session.user_id, &self.ctx.images);
        if let Err(err) = self.ctx.recipes.save(&recipe).await {
            return self.fail(write_error(err));
        }
        info!(recipe_id = %recipe.id, "recipe saved");
        self.status.set(FormStatus::Success);
        Ok(())
    }

    /// Clear the fields and forget the edited id.
    pub fn reset_state(&self) {
        self.draft.set(RecipeDraft::default());
        self.current_recipe_id.set(None);
        self.status.set(FormStatus::Idle);
    }

    fn fail(&self, err: Error) -> AppResult<()> {
        warn!(code = ?err.code(), message = %err.message(), "recipe form failed");
        self.status.set(FormStatus::Error {
            message: err.message().to_owned(),
        });
        Err(err)
    }
}

// Documents written without an id field decode with an empty one.
fn recipe_id(stored: &str, requested: &str) -> String {
    if stored.is_empty() {
        requested.to_owned()
    } else {
        stored.to_owned()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::RepositoryError;
    use crate::domain::{ErrorCode, Recipe};
    use crate::view_state::test_support::{Gate, Mocks};
    use rstest::rstest;

    fn fill(form: &RecipeFormState) {
        form.set_title("Shakshuka");
        form.set_ingredients("eggs, tomatoes,  peppers ,");
        form.set_steps("Fry peppers\nAdd tomatoes, crack eggs");
        form.set_category("Breakfast");
    }

    fn stored() -> Recipe {
        Recipe {
            id: "r1".into(),
            creator_id: "u1".into(),
            title: "Tea".into(),
            ingredients_list: vec!["tea".into(), "water".into()],
            steps_list: vec!["Boil".into(), "Steep".into()],
            category: "Beverage".into(),
            video_url: Some("https://youtu.be/tea".into()),
            image_url: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn submit_without_session_is_rejected() {
        let mut mocks = Mocks::default().without_session();
        mocks.recipes.expect_save().never();
        let form = RecipeFormState::new(mocks.into_context());
        fill(&form);

        let err = form.submit_recipe().await.expect_err("no session");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(
            form.status(),
            FormStatus::Error {
                message: LOGIN_REQUIRED.to_owned()
            }
        );
    }

    #[rstest]
    #[case::title("", "x", "x", "Soup", "", "Recipe name is required")]
    #[case::ingredients("x", " ", "x", "Soup", "", "Ingredients are required")]
    #[case::steps("x", "x", "", "Soup", "", "Instructions are required")]
    #[case::category("x", "x", "x", "", "bad", "Please select a category")]
    #[case::video("x", "x", "x", "Soup", "not a url", "Please enter a valid video URL")]
    #[tokio::test]
    async fn validation_reports_first_failure(
        #[case] title: &str,
        #[case] ingredients: &str,
        #[case] steps: &str,
        #[case] category: &str,
        #[case] video_url: &str,
        #[case] message: &str,
    ) {
        let mut mocks = Mocks::default().with_session("u1");
        mocks.recipes.expect_save().never();
        let form = RecipeFormState::new(mocks.into_context());
        form.set_title(title);
        form.set_ingredients(ingredients);
        form.set_steps(steps);
        form.set_category(category);
        form.set_video_url(video_url);

        let err = form.submit_recipe().await.expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            form.status(),
            FormStatus::Error {
                message: message.to_owned()
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn submit_splits_fields_and_assigns_owner() {
        let mut mocks = Mocks::default().with_session("u1");
        mocks
            .recipes
            .expect_save()
            .withf(|recipe| {
                !recipe.id.is_empty()
                    && recipe.creator_id == "u1"
                    && recipe.ingredients_list == ["eggs", "tomatoes", "peppers"]
                    && recipe.steps_list == ["Fry peppers", "Add tomatoes", "crack eggs"]
                    && recipe.video_url.is_none()
                    && recipe.image_url.as_deref()
                        == Some("https://source.unsplash.com/1200x900/?Shakshuka+food")
            })
            .times(1)
            .returning(|_| Ok(()));
        let form = RecipeFormState::new(mocks.into_context());
        fill(&form);

        form.submit_recipe().await.expect("submit");
        assert_eq!(form.status(), FormStatus::Success);
    }

    #[rstest]
    #[tokio::test]
    async fn edit_overwrites_loaded_id() {
        let mut mocks = Mocks::default().with_session("u1");
        mocks
            .recipes
            .expect_find_by_id()
            .returning(|_| Ok(Some(stored())));
        mocks
            .recipes
            .expect_save()
            .withf(|recipe| recipe.id == "r1" && recipe.title == "Mint Tea")
            .times(1)
            .returning(|_| Ok(()));
        let form = RecipeFormState::new(mocks.into_context());

        form.load_recipe("r1").await.expect("load");
        let draft = form.draft();
        assert_eq!(draft.ingredients, "tea, water");
        assert_eq!(draft.steps, "Boil\nSteep");
        assert_eq!(draft.video_url, "https://youtu.be/tea");
        assert_eq!(form.current_recipe_id().as_deref(), Some("r1"));
        assert_eq!(form.status(), FormStatus::Idle);

        form.set_title("Mint Tea");
        form.submit_recipe().await.expect("submit");
    }

    #[rstest]
    #[tokio::test]
    async fn missing_recipe_leaves_fields_untouched() {
        let mut mocks = Mocks::default();
        mocks.recipes.expect_find_by_id().returning(|_| Ok(None));
        let form = RecipeFormState::new(mocks.into_context());
        form.set_title("Draft in progress");

        let err = form.load_recipe("gone").await.expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(
            form.status(),
            FormStatus::Error {
                message: RECIPE_NOT_FOUND.to_owned()
            }
        );
        assert_eq!(form.draft().title, "Draft in progress");
        assert!(form.current_recipe_id().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn blank_id_is_a_no_op() {
        let mut mocks = Mocks::default();
        mocks.recipes.expect_find_by_id().never();
        let form = RecipeFormState::new(mocks.into_context());
        form.load_recipe("  ").await.expect("no-op");
        assert_eq!(form.status(), FormStatus::Idle);
    }

    #[rstest]
    #[tokio::test]
    async fn write_failure_becomes_error_and_reset_clears_it() {
        let mut mocks = Mocks::default().with_session("u1");
        mocks
            .recipes
            .expect_save()
            .returning(|_| Err(RepositoryError::write("quota exceeded")));
        let form = RecipeFormState::new(mocks.into_context());
        fill(&form);

        let err = form.submit_recipe().await.expect_err("write");
        assert_eq!(err.code(), ErrorCode::WriteFailed);
        assert_eq!(
            form.status(),
            FormStatus::Error {
                message: "quota exceeded".to_owned()
            }
        );

        form.reset_state();
        assert_eq!(form.status(), FormStatus::Idle);
        assert_eq!(form.draft(), RecipeDraft::default());
    }

    #[rstest]
    #[tokio::test]
    async fn overlapping_submit_is_rejected_as_busy() {
        let gate = Gate::default();
        let mut mocks = Mocks::default().with_session("u1");
        mocks
            .recipes
            .expect_save()
            .withf(|recipe| recipe.title == "Shakshuka")
            .times(1)
            .returning(|_| Ok(()));
        let form = RecipeFormState::new(mocks.into_gated_context(&gate));
        fill(&form);

        let (first, second) = tokio::join!(form.submit_recipe(), async {
            let second = form.submit_recipe().await;
            assert_eq!(form.status(), FormStatus::Loading);
            gate.open();
            second
        });
        first.expect("first submit");
        assert_eq!(second.expect_err("busy").code(), ErrorCode::Busy);
        assert_eq!(form.status(), FormStatus::Success);
    }
}
