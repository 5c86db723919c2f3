//! Starter templates and model prompts
//!
//! A fresh session begins from a starter artifact so the model edits an
//! existing project instead of inventing build scaffolding. The classifier
//! prompt picks which starter fits the user's idea.

use forge_types::TemplateKind;

/// Asked first, before any generation, to pick a starter.
pub const CLASSIFIER_PROMPT: &str = "Return either node or react based on what do you think this \
     project should be. Only return a single word either 'node' or 'react'. Do not return \
     anything extra";

const BASE_PROMPT: &str = "For all designs I ask you to make, have them be beautiful, not cookie \
     cutter. Make webpages that are fully featured and worthy for production.";

const SYSTEM_PROMPT: &str = "You are Forge, an expert full-stack developer. When a response \
     creates or updates project files, wrap the complete plan in a single \
     <forgeArtifact title=\"...\"> block. Emit one <forgeAction type=\"file\" \
     filePath=\"relative/path\"> element per file with the full file contents as its body, and \
     <forgeAction type=\"shell\"> elements for commands to run. Escape <, >, &, \" and ' in \
     bodies as HTML entities, or wrap the body in a CDATA section. Always send complete file \
     contents, never diffs or placeholders.";

/// System prompt appended to every chat round.
pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// The starter artifact for a template kind, in wire format.
pub fn starter(kind: TemplateKind) -> &'static str {
    match kind {
        TemplateKind::React => REACT_STARTER,
        TemplateKind::Node => NODE_STARTER,
    }
}

/// The prompt set that precedes the user's idea on a fresh session: the
/// design guidance plus the starter project presented as context.
pub fn scaffold_prompts(kind: TemplateKind) -> Vec<String> {
    vec![
        BASE_PROMPT.to_string(),
        format!(
            "Here is an artifact that contains all files of the project visible to you.\n\
             Consider the contents of ALL files in the project.\n\n{}\n\n\
             Here is a list of files that exist on the file system but are not being shown to \
             you:\n\n  - .gitignore\n  - package-lock.json\n",
            starter(kind)
        ),
    ]
}

const REACT_STARTER: &str = r#"<forgeArtifact title="Project Files"><forgeAction type="file" filePath="index.html"><!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>Vite + React + TS</title>
  </head>
  <body>
    <div id="root"></div>
    <script type="module" src="/src/main.tsx"></script>
  </body>
</html>
</forgeAction><forgeAction type="file" filePath="package.json">{
  "name": "vite-react-typescript-starter",
  "private": true,
  "version": "0.0.0",
  "type": "module",
  "scripts": {
    "dev": "vite",
    "build": "vite build",
    "preview": "vite preview"
  },
  "dependencies": {
    "react": "^18.3.1",
    "react-dom": "^18.3.1"
  },
  "devDependencies": {
    "@types/react": "^18.3.5",
    "@types/react-dom": "^18.3.0",
    "@vitejs/plugin-react": "^4.3.1",
    "typescript": "^5.5.3",
    "vite": "^5.4.2"
  }
}
</forgeAction><forgeAction type="file" filePath="vite.config.ts">import { defineConfig } from 'vite';
import react from '@vitejs/plugin-react';

export default defineConfig({
  plugins: [react()],
});
</forgeAction><forgeAction type="file" filePath="src/main.tsx">import { StrictMode } from 'react';
import { createRoot } from 'react-dom/client';
import App from './App.tsx';
import './index.css';

createRoot(document.getElementById('root')!).render(
  &lt;StrictMode&gt;
    &lt;App /&gt;
  &lt;/StrictMode&gt;
);
</forgeAction><forgeAction type="file" filePath="src/App.tsx">function App() {
  return (
    &lt;div className="app"&gt;
      &lt;p&gt;Start prompting (or editing) to see magic happen :)&lt;/p&gt;
    &lt;/div&gt;
  );
}

export default App;
</forgeAction><forgeAction type="file" filePath="src/index.css">body {
  margin: 0;
  font-family: system-ui, sans-serif;
}
</forgeAction></forgeArtifact>"#;

const NODE_STARTER: &str = r#"<forgeArtifact title="Project Files"><forgeAction type="file" filePath="package.json">{
  "name": "node-starter",
  "private": true,
  "version": "0.0.0",
  "type": "module",
  "scripts": {
    "start": "node index.js"
  }
}
</forgeAction><forgeAction type="file" filePath="index.js">console.log('Hello from your new project');
</forgeAction></forgeArtifact>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::parse_artifact;
    use forge_types::StepAction;

    #[test]
    fn react_starter_parses_into_a_full_plan() {
        let steps = parse_artifact(starter(TemplateKind::React));
        assert_eq!(steps[0].action, StepAction::CreateFolder);
        assert_eq!(steps[0].title, "Project Files");

        let paths: Vec<&str> = steps
            .iter()
            .filter_map(|s| match &s.action {
                StepAction::CreateFile { path, .. } => Some(path.as_str()),
                _ => None,
            })
            .collect();
        assert!(paths.contains(&"index.html"));
        assert!(paths.contains(&"src/App.tsx"));
    }

    #[test]
    fn starter_entities_decode_to_jsx() {
        let steps = parse_artifact(starter(TemplateKind::React));
        let app = steps
            .iter()
            .find_map(|s| match &s.action {
                StepAction::CreateFile { path, code } if path == "src/App.tsx" => Some(code),
                _ => None,
            })
            .unwrap();
        assert!(app.contains("<div className=\"app\">"));
    }

    #[test]
    fn node_starter_parses_too() {
        let steps = parse_artifact(starter(TemplateKind::Node));
        assert_eq!(steps.len(), 3);
    }

    #[test]
    fn scaffold_prompts_embed_the_starter() {
        let prompts = scaffold_prompts(TemplateKind::React);
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains("<forgeArtifact"));
    }
}
