//! Storage paths for uploaded recipe images

use tracing::info;
use uuid::Uuid;

use crate::models::Recipe;
use crate::repositories::{RecipeRepository, RepositoryResult};

/// Directory every recipe image is stored under
pub const RECIPE_UPLOAD_DIR: &str = "uploads/recipe";

/// Source of the unique file stem used for uploads
pub trait IdentifierSource {
    fn next_identifier(&self) -> String;
}

/// Fresh random v4 UUID per call
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomUuid;

impl IdentifierSource for RandomUuid {
    fn next_identifier(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl<F> IdentifierSource for F
where
    F: Fn() -> String,
{
    fn next_identifier(&self) -> String {
        self()
    }
}

/// Extension of the last path component, leading dot included
///
/// Leading dots of the file name do not start an extension, so
/// `.bashrc` has none. Returns an empty string when there is no extension.
pub fn file_extension(filename: &str) -> &str {
    let name_start = filename.rfind('/').map_or(0, |index| index + 1);
    let name = &filename[name_start..];

    match name.rfind('.') {
        Some(dot) if name[..dot].chars().any(|c| c != '.') => &name[dot..],
        _ => "",
    }
}

/// Generate file path for new recipe image
///
/// The path is `uploads/recipe/<uuid><ext>` and differs on every call.
/// The recipe itself is not inspected.
pub fn recipe_image_file_path(instance: Option<&Recipe>, filename: &str) -> String {
    recipe_image_file_path_with(&RandomUuid, instance, filename)
}

/// [`recipe_image_file_path`] with an explicit identifier source
pub fn recipe_image_file_path_with<S>(
    source: &S,
    _instance: Option<&Recipe>,
    filename: &str,
) -> String
where
    S: IdentifierSource + ?Sized,
{
    format!(
        "{}/{}{}",
        RECIPE_UPLOAD_DIR,
        source.next_identifier(),
        file_extension(filename)
    )
}

/// Assign an uploaded image to `recipe` and persist the generated path
pub async fn assign_recipe_image<R>(
    repository: &R,
    recipe: &Recipe,
    filename: &str,
) -> RepositoryResult<Recipe>
where
    R: RecipeRepository + ?Sized,
{
    let mut recipe = recipe.clone();
    let path = recipe_image_file_path(Some(&recipe), filename);
    info!("Assigning image {} to recipe {}", path, recipe.id);

    recipe.image = Some(path);
    repository.update_recipe(&recipe).await
}
