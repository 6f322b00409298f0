//! The `exercisekit init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("exercisekit.toml").exists() {
        println!("exercisekit.toml already exists, skipping.");
    } else {
        std::fs::write("exercisekit.toml", SAMPLE_CONFIG)?;
        println!("Created exercisekit.toml");
    }

    std::fs::create_dir_all("question-sets")?;
    let example_path = std::path::Path::new("question-sets/example.json");
    if example_path.exists() {
        println!("question-sets/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUESTION_SET)?;
        println!("Created question-sets/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Edit question-sets/example.json");
    println!("  2. Run: exercisekit validate --questions question-sets/example.json");
    println!("  3. Run: exercisekit inspect --questions question-sets/example.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# exercisekit configuration

# production hides the question data debugger
environment = "development"

# raster or vector coverage for tracing exercises
canvas_backend = "raster"

# delay before authoring forms emit free-text edits
debounce_ms = 500

# fix shuffles and puzzle scatter for reproducible runs
# shuffle_seed = 42

[puzzle]
board_width = 400.0
board_height = 400.0
snap_tolerance = 20.0

[tracing]
cell_size = 4
"#;

const EXAMPLE_QUESTION_SET: &str = r#"{
  "id": "example",
  "name": "Example Question Set",
  "questions": [
    {
      "id": "capitals",
      "questionType": "COMPLETION",
      "questionText": "Fill in the capital city",
      "questionData": {
        "text": "The capital of France is [blank1].",
        "blanks": [{ "id": "b1", "answer": "Paris", "position": 1 }]
      }
    },
    {
      "id": "apples",
      "questionType": "COUNTING",
      "questionText": "How many apples are there?",
      "questionData": {
        "imageUrl": "https://example.com/apples.png",
        "itemsToCount": "apples",
        "correctCount": 5,
        "minCount": 0,
        "maxCount": 10
      }
    },
    {
      "id": "sounds",
      "questionType": "MATCHING",
      "questionText": "Match each animal to its sound",
      "questionData": {
        "pairs": [
          { "id": "1", "left": "Cat", "right": "Meow" },
          { "id": "2", "left": "Dog", "right": "Woof" }
        ]
      }
    }
  ]
}
"#;
