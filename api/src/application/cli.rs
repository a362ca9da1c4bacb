use std::path::PathBuf;

use bytes::Bytes;
use fridgechef_core::domain::{
    common::entities::app_errors::CoreError,
    ingredients::entities::IngredientSummary,
    kitchen::{
        ports::KitchenService,
        value_objects::{AnalysisOutcome, SubmitImageInput},
    },
    recipe::entities::{RecipeAnalysisRow, RecipesArtifact},
    request::entities::{RequestLookup, RequestPaths},
};

use crate::args::{Action, Args};

/// Runs the analyze and recipe actions from the command line.
pub struct CliProcessor<K: KitchenService> {
    service: K,
    input_dir: PathBuf,
}

impl<K: KitchenService> CliProcessor<K> {
    pub fn new(service: K, input_dir: PathBuf) -> Self {
        Self { service, input_dir }
    }

    /// Missing inputs (no image file, no prior analysis) are reported on
    /// stdout and end the run normally.
    pub async fn run(&self, args: &Args) -> Result<(), anyhow::Error> {
        match self.execute(args).await {
            Err(CoreError::NotFound(message)) => {
                println!("Error: {}", message);
                Ok(())
            }
            result => Ok(result?),
        }
    }

    async fn execute(&self, args: &Args) -> Result<(), CoreError> {
        let needs_image = matches!(args.action, Action::Analyze | Action::Both);
        if needs_image && args.image.is_none() {
            println!("Error: Image filename required for analysis");
            return Ok(());
        }

        let mut created: Option<RequestPaths> = None;

        if let Some(image) = args.image.as_deref().filter(|_| needs_image) {
            let outcome = self.analyze(image).await?;
            println!("\n==== INGREDIENTS SUMMARY ====");
            println!("{}", format_summary(&outcome.summary));
            println!("Request ID: {}", outcome.paths.request_id);
            created = Some(outcome.paths);
        }

        if matches!(args.action, Action::Recipes | Action::Both) {
            let lookup = match created {
                Some(paths) => RequestLookup::ById(paths.request_id),
                None => RequestLookup::from(args.request_id.clone()),
            };

            let (paths, recipes) = self.recipes(lookup, args.recipes).await?;
            println!("\n==== RECIPE ANALYSIS ====");
            if recipes.analysis.is_empty() {
                println!("No recipes were generated.");
            } else {
                println!("{}", format_recipe_table(&recipes.analysis));
            }
            println!("Request ID: {}", paths.request_id);
        }

        Ok(())
    }

    /// Copies an image from the input directory into a new request and
    /// analyzes it.
    pub async fn analyze(&self, image: &str) -> Result<AnalysisOutcome, CoreError> {
        let source = self.input_dir.join(image);
        let image_data = tokio::fs::read(&source).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                CoreError::NotFound(format!("Image file {} not found", source.display()))
            }
            _ => CoreError::Storage(format!("Failed to read {}: {}", source.display(), e)),
        })?;

        let paths = self
            .service
            .submit_image(SubmitImageInput {
                filename: Some(image.to_string()),
                image_data: Bytes::from(image_data),
            })
            .await?;

        self.service.analyze_request(&paths).await
    }

    pub async fn recipes(
        &self,
        lookup: RequestLookup,
        num_recipes: u32,
    ) -> Result<(RequestPaths, RecipesArtifact), CoreError> {
        self.service.suggest_recipes(lookup, num_recipes).await
    }
}

pub fn format_summary(summary: &IngredientSummary) -> String {
    let mut lines = vec![
        format!("Total ingredients: {}", summary.total_count),
        format!("Categories: {}", summary.category_count),
    ];
    lines.extend(
        summary
            .counts_by_category
            .iter()
            .map(|(category, count)| format!("  {}: {}", category, count)),
    );
    lines.join("\n")
}

pub fn format_recipe_table(rows: &[RecipeAnalysisRow]) -> String {
    let name_width = rows
        .iter()
        .map(|row| row.recipe_name.len())
        .chain(std::iter::once("Recipe".len()))
        .max()
        .unwrap_or_default();

    let mut lines = vec![format!(
        "{:<name_width$}  {:>12}  {:>9}  {:>7}  {:>5}  {:<12}  {}",
        "Recipe", "Completeness", "Available", "Missing", "Total", "Time", "Difficulty"
    )];
    lines.extend(rows.iter().map(|row| {
        format!(
            "{:<name_width$}  {:>11.0}%  {:>9}  {:>7}  {:>5}  {:<12}  {}",
            row.recipe_name,
            row.completeness,
            row.available_count,
            row.missing_count,
            row.total_ingredients,
            row.cooking_time,
            row.difficulty
        )
    }));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use fridgechef_core::domain::recipe::entities::Difficulty;

    use super::*;

    #[test]
    fn test_format_summary_lists_categories() {
        let summary = IngredientSummary {
            total_count: 3,
            category_count: 2,
            counts_by_category: BTreeMap::from([
                ("Dairy".to_string(), 2),
                ("Produce".to_string(), 1),
            ]),
        };

        let text = format_summary(&summary);

        assert!(text.contains("Total ingredients: 3"));
        assert!(text.contains("  Dairy: 2"));
        assert!(text.contains("  Produce: 1"));
    }

    #[test]
    fn test_format_recipe_table_aligns_rows() {
        let rows = vec![RecipeAnalysisRow {
            recipe_name: "Baked Apple".to_string(),
            completeness: 100.0,
            available_count: 1,
            missing_count: 0,
            total_ingredients: 1,
            cooking_time: "25 minutes".to_string(),
            difficulty: Difficulty::Easy,
        }];

        let table = format_recipe_table(&rows);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Recipe     "));
        assert!(lines[1].starts_with("Baked Apple"));
        assert!(lines[1].contains("100%"));
        assert!(lines[1].ends_with("Easy"));
    }
}
