use std::fs;
use std::path::PathBuf;

use project_ledger::config::*;
use project_ledger::models::{CreateProjectInput, SearchQuery};
use project_ledger::repository::{ProjectRepository, TemplateStatus};
use speculate2::speculate;

fn write_config(path: &std::path::Path, content: &str) {
    fs::create_dir_all(path.parent().expect("config path has a parent"))
        .expect("Failed to create config dir");
    fs::write(path, content).expect("Failed to write config");
}

speculate! {
    before {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("ledger").join("config.ini");
    }

    describe "load_or_init" {
        it "creates the file with the default root" {
            let config = Config::load_or_init(&path).expect("Failed to load");

            assert!(path.exists());
            assert_eq!(config.root_path(), default_root());

            let content = fs::read_to_string(&path).expect("Failed to read config");
            assert!(content.contains("[Settings]"));
            assert!(content.contains("main_project_directory"));
        }

        it "reads an existing file" {
            write_config(&path, "[Settings]\nmain_project_directory = /srv/projects\n");

            let config = Config::load_or_init(&path).expect("Failed to load");
            assert_eq!(config.root_path(), PathBuf::from("/srv/projects"));
        }

        it "accepts a lowercase section" {
            write_config(&path, "[settings]\nmain_project_directory = /srv/lower\n");

            let config = Config::load_or_init(&path).expect("Failed to load");
            assert_eq!(config.root_path(), PathBuf::from("/srv/lower"));
        }

        it "adds the section to a file that lacks it" {
            write_config(&path, "[Other]\nkey = value\n");

            let config = Config::load_or_init(&path).expect("Failed to load");
            assert_eq!(config.root_path(), default_root());

            let content = fs::read_to_string(&path).expect("Failed to read config");
            assert!(content.contains("[Settings]"));
            assert!(content.contains("[Other]"));
        }

        it "keeps backslashes in Windows paths" {
            write_config(&path, "[Settings]\nmain_project_directory = D:\\Projects\\rust\n");

            let config = Config::load_or_init(&path).expect("Failed to load");
            assert_eq!(config.root_path(), PathBuf::from("D:\\Projects\\rust"));
        }
    }

    describe "set_root_path" {
        it "persists the new root" {
            let mut config = Config::load_or_init(&path).expect("Failed to load");
            config.set_root_path(&PathBuf::from("/data/work")).expect("Failed to set");

            let reloaded = Config::load_or_init(&path).expect("Failed to reload");
            assert_eq!(reloaded.root_path(), PathBuf::from("/data/work"));
        }

        it "overwrites the previous value and keeps other settings" {
            write_config(&path, "[Settings]\nmain_project_directory = /old\ntemplates = python:main.py\n");

            let mut config = Config::load_or_init(&path).expect("Failed to load");
            config.set_root_path(&PathBuf::from("/new")).expect("Failed to set");

            let content = fs::read_to_string(&path).expect("Failed to read config");
            assert_eq!(content.matches("main_project_directory").count(), 1);
            assert!(!content.contains("/old"));
            assert!(content.contains("python:main.py"));
        }
    }

    describe "templates" {
        it "parses the registry" {
            write_config(&path, "[Settings]\nmain_project_directory = /srv\nTemplates = python:main.py,readme:README.md\n");

            let config = Config::load_or_init(&path).expect("Failed to load");
            let registry = config.templates().expect("Failed to parse templates");

            assert_eq!(registry.get("python"), Some("main.py"));
            assert_eq!(registry.get("readme"), Some("README.md"));
        }

        it "fails when no registry is configured" {
            let config = Config::load_or_init(&path).expect("Failed to load");
            assert!(matches!(config.templates(), Err(ConfigError::MissingTemplates)));
        }

        it "fails on a malformed registry" {
            write_config(&path, "[Settings]\nmain_project_directory = /srv\ntemplates = python\n");

            let config = Config::load_or_init(&path).expect("Failed to load");
            assert!(matches!(config.templates(), Err(ConfigError::MalformedTemplates(_))));
        }

        it "looks for template files beside the config file by default" {
            let config = Config::load_or_init(&path).expect("Failed to load");
            assert_eq!(config.templates_dir(), temp_dir.path().join("ledger").join("templates"));
        }

        it "honours templates_directory" {
            write_config(&path, "[Settings]\nmain_project_directory = /srv\ntemplates_directory = /opt/templates\n");

            let config = Config::load_or_init(&path).expect("Failed to load");
            assert_eq!(config.templates_dir(), PathBuf::from("/opt/templates"));
        }
    }

    describe "repository from config" {
        it "uses the configured root and templates" {
            let root = temp_dir.path().join("projects");
            let templates = temp_dir.path().join("ledger").join("templates");
            fs::create_dir_all(&templates).expect("Failed to create dir");
            fs::write(templates.join("README.md"), "# New project\n").expect("write");
            write_config(&path, &format!(
                "[Settings]\nmain_project_directory = {}\ntemplates = readme:README.md\n",
                root.display()
            ));

            let config = Config::load_or_init(&path).expect("Failed to load");
            let repo = ProjectRepository::from_config(&config).expect("Failed to open repository");
            assert_eq!(repo.root(), root.as_path());

            let created = repo.create_project(CreateProjectInput {
                templates: vec!["readme".to_string()],
                ..CreateProjectInput::named("Foo")
            }).expect("Failed to create");

            assert_eq!(created.path, root.join("Foo"));
            assert_eq!(
                created.templates[0].status,
                TemplateStatus::Copied(root.join("Foo").join("README.md"))
            );
        }

        it "works without a template registry" {
            let config = Config::load_or_init(&path).expect("Failed to load");
            let repo = ProjectRepository::from_config(&config).expect("Failed to open repository");
            assert!(repo.templates().is_none());
        }

        it "refuses a malformed registry" {
            write_config(&path, "[Settings]\nmain_project_directory = /srv\ntemplates = a:b:c\n");

            let config = Config::load_or_init(&path).expect("Failed to load");
            assert!(ProjectRepository::from_config(&config).is_err());
        }

        it "opens without templates despite a malformed registry" {
            let root = temp_dir.path().join("projects");
            fs::create_dir_all(root.join("Foo")).expect("Failed to create dir");
            fs::write(root.join("Foo").join("details.json"), r#"{"Project Name": "Foo"}"#)
                .expect("write");
            write_config(&path, &format!(
                "[Settings]\nmain_project_directory = {}\ntemplates = a:b:c\n",
                root.display()
            ));

            let config = Config::load_or_init(&path).expect("Failed to load");
            let repo = ProjectRepository::open(&config);
            assert_eq!(repo.root(), root.as_path());
            assert!(repo.templates().is_none());

            let results = repo.search_projects(&SearchQuery::default()).expect("Failed to search");
            assert_eq!(results.names(), ["Foo".to_string()]);
        }
    }
}
