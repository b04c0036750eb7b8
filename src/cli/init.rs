use std::path::PathBuf;
use std::process;

use tplc::project::PROJECT_FILE;

const EXAMPLE_TEMPLATE: &str = r#"{
  "kind": "html",
  "children": [
    {
      "type": "element",
      "tag": "div",
      "properties": [
        { "kind": "attribute", "key": "class", "value": 0 }
      ],
      "children": [
        { "type": "text", "value": "Hello, " },
        { "type": "expr", "value": 1 },
        { "type": "text", "value": "!" }
      ]
    }
  ]
}
"#;

pub fn cmd_init(name: Option<String>) {
    let (project_dir, project_name) = if let Some(ref name) = name {
        let dir = PathBuf::from(name);
        (dir, name.clone())
    } else {
        let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("templates")
            .to_string();
        (dir, name)
    };

    if name.is_some() {
        if let Err(e) = std::fs::create_dir_all(&project_dir) {
            eprintln!(
                "error: cannot create directory '{}': {}",
                project_dir.display(),
                e
            );
            process::exit(1);
        }
    }

    let toml_path = project_dir.join(PROJECT_FILE);
    if toml_path.exists() {
        eprintln!("error: '{}' already exists", toml_path.display());
        process::exit(1);
    }

    let toml_content = format!(
        "[project]\nname = \"{}\"\nversion = \"0.1.0\"\nentry = \"template.json\"\n\n[compile]\nnormalize = true\n",
        project_name
    );

    if let Err(e) = std::fs::write(&toml_path, &toml_content) {
        eprintln!("error: cannot write '{}': {}", toml_path.display(), e);
        process::exit(1);
    }

    let template_path = project_dir.join("template.json");
    if let Err(e) = std::fs::write(&template_path, EXAMPLE_TEMPLATE) {
        eprintln!("error: cannot write '{}': {}", template_path.display(), e);
        process::exit(1);
    }

    eprintln!(
        "Created project '{}' in {}",
        project_name,
        project_dir.display()
    );
    eprintln!("  {}", toml_path.display());
    eprintln!("  {}", template_path.display());
}
