//! Interactive menu-driven movie catalog application.
//!
//! All input and output goes through generic `BufRead`/`Write` handles
//! so the whole loop can be driven from tests with in-memory buffers.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use rand::seq::IteratorRandom;
use tracing::warn;

use marquee_core::{
    best_matches, filter_ranked, rating_stats, write_gallery, CatalogService, GalleryConfig,
    MetadataError, MetadataProvider, SelectionStep, MATCH_LIMIT, MATCH_THRESHOLD,
};

const MENU: &str = "\
Menu:
0. Exit
1. List movies
2. Add movie
3. Delete movie
4. Update movie
5. Stats
6. Random movie
7. Search movie
8. Movies sorted by rating
9. Generate website";

/// The interactive application loop.
pub struct MovieApp<R, W> {
    service: CatalogService,
    metadata: Option<Arc<dyn MetadataProvider>>,
    gallery: GalleryConfig,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> MovieApp<R, W> {
    pub fn new(
        service: CatalogService,
        metadata: Option<Arc<dyn MetadataProvider>>,
        gallery: GalleryConfig,
        input: R,
        output: W,
    ) -> Self {
        Self {
            service,
            metadata,
            gallery,
            input,
            output,
        }
    }

    /// Run the menu loop until the user exits or input ends.
    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.output, "********** My Movies Database **********")?;

        loop {
            writeln!(self.output)?;
            writeln!(self.output, "{}", MENU)?;
            write!(self.output, "Enter choice (0-9): ")?;
            self.output.flush()?;

            let choice = match self.read_line()? {
                Some(line) => line,
                None => break,
            };

            match choice.trim() {
                "0" => {
                    writeln!(self.output, "Bye!")?;
                    break;
                }
                "1" => self.list_movies()?,
                "2" => self.add_movie().await?,
                "3" => self.delete_movie()?,
                "4" => self.update_movie()?,
                "5" => self.show_stats()?,
                "6" => self.random_movie()?,
                "7" => self.search_movies()?,
                "8" => self.movies_by_rating()?,
                "9" => self.generate_website()?,
                other => {
                    writeln!(self.output, "Invalid choice: {}", other)?;
                    continue;
                }
            }

            write!(self.output, "\nPress enter to continue ")?;
            self.output.flush()?;
            if self.read_line()?.is_none() {
                break;
            }
        }

        Ok(())
    }

    fn list_movies(&mut self) -> Result<()> {
        let catalog = self.service.list()?;
        writeln!(self.output, "{} movies in total", catalog.len())?;
        for (title, record) in &catalog {
            writeln!(
                self.output,
                "{} ({}): {}",
                title, record.year, record.rating
            )?;
        }
        Ok(())
    }

    async fn add_movie(&mut self) -> Result<()> {
        write!(self.output, "Enter new movie name: ")?;
        self.output.flush()?;
        let title = match self.read_line()? {
            Some(line) => line.trim().to_string(),
            None => return Ok(()),
        };
        if title.is_empty() {
            writeln!(self.output, "Invalid input! Title cannot be empty.")?;
            return Ok(());
        }
        if self.service.exists(&title)? {
            writeln!(self.output, "Movie {} already exist!", title)?;
            return Ok(());
        }

        let result = match self.metadata.clone() {
            Some(provider) => self.add_from_metadata(provider, &title).await?,
            None => self.add_manually(&title)?,
        };

        if let Some(added) = result {
            writeln!(self.output, "Movie {} successfully added", added)?;
        }
        Ok(())
    }

    /// Fetch details from the metadata provider and add the movie under
    /// its official title.
    async fn add_from_metadata(
        &mut self,
        provider: Arc<dyn MetadataProvider>,
        title: &str,
    ) -> Result<Option<String>> {
        let metadata = match provider.fetch(title).await {
            Ok(metadata) => metadata,
            Err(MetadataError::NotFound(_)) => {
                writeln!(self.output, "Movie {} not found in the movie database", title)?;
                return Ok(None);
            }
            Err(e) => {
                warn!("Metadata lookup failed: {}", e);
                writeln!(self.output, "Could not fetch movie details: {}", e)?;
                return Ok(None);
            }
        };

        if self.service.exists(&metadata.title)? {
            writeln!(self.output, "Movie {} already exist!", metadata.title)?;
            return Ok(None);
        }

        self.service.add(
            &metadata.title,
            metadata.year,
            metadata.rating,
            &metadata.poster,
            &metadata.imdb_id,
        )?;
        Ok(Some(metadata.title))
    }

    /// Prompt for year, rating and poster by hand.
    fn add_manually(&mut self, title: &str) -> Result<Option<String>> {
        let year = match self.prompt_year()? {
            Some(year) => year,
            None => return Ok(None),
        };
        let rating = match self.prompt_rating("Enter movie rating (0-10): ")? {
            Some(rating) => rating,
            None => return Ok(None),
        };
        write!(self.output, "Enter poster URL (optional): ")?;
        self.output.flush()?;
        let poster = match self.read_line()? {
            Some(line) => line.trim().to_string(),
            None => return Ok(None),
        };

        self.service.add(title, year, rating, &poster, "")?;
        Ok(Some(title.to_string()))
    }

    fn delete_movie(&mut self) -> Result<()> {
        let title = match self.run_selection()? {
            Some(title) => title,
            None => return Ok(()),
        };
        self.service.delete(&title)?;
        writeln!(self.output, "Movie {} successfully deleted", title)?;
        Ok(())
    }

    fn update_movie(&mut self) -> Result<()> {
        let title = match self.run_selection()? {
            Some(title) => title,
            None => return Ok(()),
        };
        let current = self.service.list()?[&title].clone();

        // 'c' keeps the current rating
        let rating = loop {
            write!(
                self.output,
                "Enter new rating (0-10), or 'c' to keep {}: ",
                current.rating
            )?;
            self.output.flush()?;
            let line = match self.read_line()? {
                Some(line) => line.trim().to_string(),
                None => return Ok(()),
            };
            if line.eq_ignore_ascii_case("c") {
                break current.rating;
            }
            match parse_rating(&line) {
                Some(rating) => break rating,
                None => writeln!(self.output, "Invalid rating, try again.")?,
            }
        };

        write!(self.output, "Enter movie notes, or 'q' to leave empty: ")?;
        self.output.flush()?;
        let notes = match self.read_line()? {
            Some(line) => {
                let line = line.trim().to_string();
                if line.eq_ignore_ascii_case("q") {
                    String::new()
                } else {
                    line
                }
            }
            None => return Ok(()),
        };

        self.service.update(&title, rating, &notes)?;
        writeln!(self.output, "Movie {} successfully updated", title)?;
        Ok(())
    }

    fn show_stats(&mut self) -> Result<()> {
        let catalog = self.service.list()?;
        let stats = match rating_stats(&catalog) {
            Some(stats) => stats,
            None => {
                writeln!(self.output, "No movies in the database")?;
                return Ok(());
            }
        };

        writeln!(self.output, "Average rating: {:.1}", stats.average)?;
        writeln!(self.output, "Median rating: {:.1}", stats.median)?;
        for title in &stats.best {
            writeln!(self.output, "Best movie: {}, {}", title, stats.highest)?;
        }
        for title in &stats.worst {
            writeln!(self.output, "Worst movie: {}, {}", title, stats.lowest)?;
        }
        Ok(())
    }

    fn random_movie(&mut self) -> Result<()> {
        let catalog = self.service.list()?;
        let mut rng = rand::thread_rng();
        match catalog.iter().choose(&mut rng) {
            Some((title, record)) => writeln!(
                self.output,
                "Your movie for tonight: {}, it's rated {}",
                title, record.rating
            )?,
            None => writeln!(self.output, "No movies in the database")?,
        }
        Ok(())
    }

    /// One-shot fuzzy search: print the ranked matches, no selection.
    fn search_movies(&mut self) -> Result<()> {
        write!(self.output, "Enter part of movie name: ")?;
        self.output.flush()?;
        let fragment = match self.read_line()? {
            Some(line) => line.trim().to_string(),
            None => return Ok(()),
        };

        let catalog = self.service.list()?;
        let titles: Vec<String> = catalog.keys().cloned().collect();
        let matches = filter_ranked(best_matches(&fragment, &titles, MATCH_LIMIT), MATCH_THRESHOLD);

        if matches.is_empty() {
            writeln!(self.output, "No matches found")?;
            return Ok(());
        }
        for matched in matches {
            let record = &catalog[&matched.title];
            writeln!(
                self.output,
                "{} ({}): {}",
                matched.title, record.year, record.rating
            )?;
        }
        Ok(())
    }

    fn movies_by_rating(&mut self) -> Result<()> {
        let catalog = self.service.list()?;
        let mut movies: Vec<_> = catalog.iter().collect();
        movies.sort_by(|a, b| {
            b.1.rating
                .partial_cmp(&a.1.rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for (title, record) in movies {
            writeln!(
                self.output,
                "{} ({}): {}",
                title, record.year, record.rating
            )?;
        }
        Ok(())
    }

    fn generate_website(&mut self) -> Result<()> {
        let catalog = self.service.list()?;
        match write_gallery(
            &catalog,
            &self.gallery.template_path,
            &self.gallery.output_path,
            &self.gallery.page_title,
        ) {
            Ok(()) => writeln!(self.output, "Website was generated successfully.")?,
            Err(e) => writeln!(self.output, "Website generation failed: {}", e)?,
        }
        Ok(())
    }

    /// Drive the fuzzy selection state machine against the current
    /// catalog. Returns `None` when the user cancels or input ends.
    fn run_selection(&mut self) -> Result<Option<String>> {
        let mut flow = self.service.start_selection()?;
        write!(self.output, "Enter part of movie name (q to cancel): ")?;
        self.output.flush()?;

        loop {
            let line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(None),
            };

            match flow.submit(&line) {
                SelectionStep::RePrompt(message) => {
                    writeln!(self.output, "{}", message)?;
                    write!(self.output, "> ")?;
                    self.output.flush()?;
                }
                SelectionStep::Menu(matches) => {
                    for (i, matched) in matches.iter().enumerate() {
                        writeln!(self.output, "{}. {} ({}%)", i + 1, matched.title, matched.score)?;
                    }
                    write!(self.output, "Choose a movie (q to cancel): ")?;
                    self.output.flush()?;
                }
                SelectionStep::Resolved(title) => return Ok(Some(title)),
                SelectionStep::Cancelled => return Ok(None),
            }
        }
    }

    fn prompt_year(&mut self) -> Result<Option<i32>> {
        loop {
            write!(self.output, "Enter movie year: ")?;
            self.output.flush()?;
            let line = match self.read_line()? {
                Some(line) => line.trim().to_string(),
                None => return Ok(None),
            };
            match line.parse() {
                Ok(year) => return Ok(Some(year)),
                Err(_) => writeln!(self.output, "Invalid year, try again.")?,
            }
        }
    }

    fn prompt_rating(&mut self, prompt: &str) -> Result<Option<f64>> {
        loop {
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;
            let line = match self.read_line()? {
                Some(line) => line.trim().to_string(),
                None => return Ok(None),
            };
            match parse_rating(&line) {
                Some(rating) => return Ok(Some(rating)),
                None => writeln!(self.output, "Invalid rating, try again.")?,
            }
        }
    }

    /// One line of input, or `None` on end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Parse a rating, accepting a comma as the decimal separator and
/// rejecting out-of-range values.
fn parse_rating(input: &str) -> Option<f64> {
    let rating: f64 = input.replace(',', ".").parse().ok()?;
    marquee_core::validate_rating(rating).ok().map(|_| rating)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    use marquee_core::testing::{fixtures, MockMetadataProvider};
    use marquee_core::{JsonStorage, MetadataError};

    fn service_in(dir: &TempDir) -> CatalogService {
        let storage = JsonStorage::open(dir.path().join("movies.json")).unwrap();
        CatalogService::new(Box::new(storage))
    }

    async fn run_app(
        service: CatalogService,
        metadata: Option<Arc<dyn MetadataProvider>>,
        input: &str,
    ) -> String {
        let mut output = Vec::new();
        {
            let mut app = MovieApp::new(
                service,
                metadata,
                GalleryConfig::default(),
                Cursor::new(input.to_string()),
                &mut output,
            );
            app.run().await.unwrap();
        }
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn test_exit_immediately() {
        let dir = TempDir::new().unwrap();
        let output = run_app(service_in(&dir), None, "0\n").await;
        assert!(output.contains("My Movies Database"));
        assert!(output.contains("Bye!"));
    }

    #[tokio::test]
    async fn test_list_empty_catalog() {
        let dir = TempDir::new().unwrap();
        let output = run_app(service_in(&dir), None, "1\n\n0\n").await;
        assert!(output.contains("0 movies in total"));
    }

    #[tokio::test]
    async fn test_manual_add_then_list() {
        let dir = TempDir::new().unwrap();
        let input = "2\nAnora\n2024\n7,6\nposter.jpg\n\n1\n\n0\n";
        let output = run_app(service_in(&dir), None, input).await;

        assert!(output.contains("Movie Anora successfully added"));
        assert!(output.contains("1 movies in total"));
        assert!(output.contains("Anora (2024): 7.6"));
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_year_then_accepts() {
        let dir = TempDir::new().unwrap();
        let input = "2\nAnora\nsoon\n2024\n7.6\n\n\n0\n";
        let output = run_app(service_in(&dir), None, input).await;

        assert!(output.contains("Invalid year, try again."));
        assert!(output.contains("Movie Anora successfully added"));
    }

    #[tokio::test]
    async fn test_add_duplicate_is_reported() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        service.add("Anora", 2024, 7.6, "p", "tt1").unwrap();

        let output = run_app(service, None, "2\nAnora\n\n0\n").await;
        assert!(output.contains("Movie Anora already exist!"));
    }

    #[tokio::test]
    async fn test_add_via_metadata_provider() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(MockMetadataProvider::new());
        provider
            .add_response(fixtures::movie_metadata("The Matrix", 1999, 8.7))
            .await;

        let service = service_in(&dir);
        let input = "2\nThe Matrix\n\n1\n\n0\n";
        let output = run_app(service, Some(provider.clone()), input).await;

        assert!(output.contains("Movie The Matrix successfully added"));
        assert!(output.contains("The Matrix (1999): 8.7"));
        assert_eq!(provider.lookups().await, vec!["The Matrix"]);
    }

    #[tokio::test]
    async fn test_add_via_metadata_miss_is_reported() {
        let dir = TempDir::new().unwrap();
        let provider: Arc<dyn MetadataProvider> = Arc::new(MockMetadataProvider::new());

        let output = run_app(service_in(&dir), Some(provider), "2\nNope\n\n0\n").await;
        assert!(output.contains("Movie Nope not found in the movie database"));
    }

    #[tokio::test]
    async fn test_add_via_metadata_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(MockMetadataProvider::new());
        provider
            .set_next_error(MetadataError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
            .await;

        let output = run_app(service_in(&dir), Some(provider), "2\nHeat\n\n0\n").await;
        assert!(output.contains("Could not fetch movie details"));
    }

    #[tokio::test]
    async fn test_delete_via_fuzzy_selection() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        service.add("Anora", 2024, 7.6, "p", "tt1").unwrap();
        service.add("The Godfather", 1972, 9.2, "p", "tt2").unwrap();

        let input = "3\ngodfather\n1\n\n1\n\n0\n";
        let output = run_app(service, None, input).await;

        assert!(output.contains("1. The Godfather"));
        assert!(output.contains("Movie The Godfather successfully deleted"));
        assert!(output.contains("1 movies in total"));
    }

    #[tokio::test]
    async fn test_delete_cancelled_keeps_catalog() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        service.add("Anora", 2024, 7.6, "p", "tt1").unwrap();

        let output = run_app(service, None, "3\nq\n\n1\n\n0\n").await;
        assert!(output.contains("1 movies in total"));
        assert!(!output.contains("successfully deleted"));
    }

    #[tokio::test]
    async fn test_update_keeps_current_rating_with_c() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        service.add("Anora", 2024, 7.6, "p", "tt1").unwrap();

        let input = "4\nanora\n1\nc\ngreat movie\n\n1\n\n0\n";
        let output = run_app(service, None, input).await;

        assert!(output.contains("Movie Anora successfully updated"));
        assert!(output.contains("Anora (2024): 7.6"));
    }

    #[tokio::test]
    async fn test_update_with_comma_rating_and_skipped_notes() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        service.add("Anora", 2024, 7.6, "p", "tt1").unwrap();

        let input = "4\nanora\n1\n9,1\nq\n\n1\n\n0\n";
        let output = run_app(service, None, input).await;

        assert!(output.contains("Movie Anora successfully updated"));
        assert!(output.contains("Anora (2024): 9.1"));
    }

    #[tokio::test]
    async fn test_stats_output() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        service.add("Anora", 2024, 6.0, "p", "tt1").unwrap();
        service.add("Heat", 1995, 8.0, "p", "tt2").unwrap();

        let output = run_app(service, None, "5\n\n0\n").await;
        assert!(output.contains("Average rating: 7.0"));
        assert!(output.contains("Median rating: 7.0"));
        assert!(output.contains("Best movie: Heat, 8"));
        assert!(output.contains("Worst movie: Anora, 6"));
    }

    #[tokio::test]
    async fn test_random_movie_from_single_entry() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        service.add("Anora", 2024, 7.6, "p", "tt1").unwrap();

        let output = run_app(service, None, "6\n\n0\n").await;
        assert!(output.contains("Your movie for tonight: Anora, it's rated 7.6"));
    }

    #[tokio::test]
    async fn test_search_lists_matches_without_selection() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        service.add("Anora", 2024, 7.6, "p", "tt1").unwrap();
        service.add("The Godfather", 1972, 9.2, "p", "tt2").unwrap();

        let output = run_app(service, None, "7\nanora\n\n0\n").await;
        assert!(output.contains("Anora (2024): 7.6"));
        assert!(!output.contains("The Godfather (1972)"));
    }

    #[tokio::test]
    async fn test_movies_sorted_by_rating_descending() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        service.add("Anora", 2024, 7.6, "p", "tt1").unwrap();
        service.add("The Godfather", 1972, 9.2, "p", "tt2").unwrap();

        let output = run_app(service, None, "8\n\n0\n").await;
        let godfather = output.find("The Godfather (1972)").unwrap();
        let anora = output.find("Anora (2024)").unwrap();
        assert!(godfather < anora);
    }

    #[tokio::test]
    async fn test_generate_website() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        service.add("Anora", 2024, 7.6, "p", "tt1").unwrap();

        let template_path = dir.path().join("template.html");
        let output_path = dir.path().join("index.html");
        std::fs::write(
            &template_path,
            "<title>__TEMPLATE_TITLE__</title><ol>__TEMPLATE_MOVIE_GRID__</ol>",
        )
        .unwrap();

        let mut output = Vec::new();
        let gallery = GalleryConfig {
            template_path: template_path.clone(),
            output_path: output_path.clone(),
            page_title: "My movies".to_string(),
        };
        let mut app = MovieApp::new(
            service,
            None,
            gallery,
            Cursor::new("9\n\n0\n".to_string()),
            &mut output,
        );
        app.run().await.unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Website was generated successfully."));
        let html = std::fs::read_to_string(&output_path).unwrap();
        assert!(html.contains("My movies"));
        assert!(html.contains("Anora"));
    }

    #[tokio::test]
    async fn test_invalid_menu_choice_reprompts() {
        let dir = TempDir::new().unwrap();
        let output = run_app(service_in(&dir), None, "x\n0\n").await;
        assert!(output.contains("Invalid choice: x"));
        assert!(output.contains("Bye!"));
    }
}
