//! Pipeline runner: generate, pre-render hooks, render, post-render hooks

use tracing::{debug, info};

use super::hooks::{PostRenderHook, PreRenderHook};
use crate::codegen::{
    default_generators, render_output, GenerationConfig, GenerationContext, Generator, Output,
    RenderedOutput,
};
use crate::error::{CodegenError, Result};
use crate::schema::Schema;

/// Ordered generators and hooks run against a schema set.
///
/// Stages run strictly in sequence and the first failure aborts the run;
/// nothing is returned (or written) for a failed run.
pub struct Pipeline {
    config: GenerationConfig,
    generators: Vec<Box<dyn Generator>>,
    pre_render_hooks: Vec<Box<dyn PreRenderHook>>,
    post_render_hooks: Vec<Box<dyn PostRenderHook>>,
}

impl Pipeline {
    /// A pipeline with no generators or hooks
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            config,
            generators: Vec::new(),
            pre_render_hooks: Vec::new(),
            post_render_hooks: Vec::new(),
        }
    }

    /// A pipeline with the entity, enum and domain generators
    pub fn with_default_generators(config: GenerationConfig) -> Self {
        let mut pipeline = Self::new(config);
        pipeline.generators = default_generators();
        pipeline
    }

    pub fn generator(mut self, generator: impl Generator + 'static) -> Self {
        self.generators.push(Box::new(generator));
        self
    }

    pub fn pre_render(mut self, hook: impl PreRenderHook + 'static) -> Self {
        self.pre_render_hooks.push(Box::new(hook));
        self
    }

    pub fn post_render(mut self, hook: impl PostRenderHook + 'static) -> Self {
        self.post_render_hooks.push(Box::new(hook));
        self
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Stage 1: run every generator over every accepted subject
    pub fn generate(&self, schemas: &[Schema]) -> Result<Output> {
        let ctx = GenerationContext::new(schemas, &self.config);
        let mut output = Output::new();

        for generator in &self.generators {
            for schema in schemas {
                for subject in schema.subjects() {
                    if !ctx.accepts(&subject) || !generator.accepts(&subject) {
                        continue;
                    }

                    let wrap = |source: CodegenError| CodegenError::Generator {
                        generator: generator.name().to_string(),
                        subject: subject.to_string(),
                        source: Box::new(source),
                    };

                    let files = generator.generate(subject, &ctx).map_err(wrap)?;
                    for file in files {
                        output
                            .merge(file.path, file.kind, file.declarations)
                            .map_err(wrap)?;
                    }
                }
            }
            debug!("Generator `{}` done, {} files so far", generator.name(), output.len());
        }

        Ok(output)
    }

    /// Run all four stages and return the final rendered files
    pub async fn run(&self, schemas: &[Schema]) -> Result<RenderedOutput> {
        let mut output = self.generate(schemas)?;
        info!("Generated {} files", output.len());

        for hook in &self.pre_render_hooks {
            debug!("Running pre-render hook `{}`", hook.name());
            output = hook
                .apply(output)
                .await
                .map_err(|source| CodegenError::PreRenderHook {
                    hook: hook.name().to_string(),
                    source,
                })?;
        }

        let mut rendered = render_output(&output)?;

        for hook in &self.post_render_hooks {
            debug!("Running post-render hook `{}`", hook.name());
            rendered = hook
                .apply(rendered)
                .map_err(|source| CodegenError::PostRenderHook {
                    hook: hook.name().to_string(),
                    source,
                })?;
        }

        info!("Rendered {} files", rendered.len());
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::codegen::{
        Declaration, FileKind, GeneratedFile, GenericDeclaration,
    };
    use crate::pipeline::{PostRenderFn, PreRenderFn};
    use crate::schema::{Entity, EntityKind, Subject};

    /// Emits one generic line per entity into a shared file
    struct LineGenerator {
        name: &'static str,
        path: &'static str,
    }

    impl Generator for LineGenerator {
        fn name(&self) -> &str {
            self.name
        }

        fn accepts(&self, subject: &Subject<'_>) -> bool {
            matches!(subject, Subject::Entity(_))
        }

        fn generate(
            &self,
            subject: Subject<'_>,
            _ctx: &GenerationContext<'_>,
        ) -> Result<Vec<GeneratedFile>> {
            Ok(vec![GeneratedFile {
                path: self.path.to_string(),
                kind: FileKind::TypeScript,
                declarations: vec![Declaration::Generic(GenericDeclaration {
                    comment: vec![],
                    lines: vec![format!("// {} {}", self.name, subject.name())],
                    imports: vec![],
                })],
            }])
        }
    }

    fn schemas() -> Vec<Schema> {
        let entity = |name: &str| Entity {
            kind: EntityKind::Table,
            schema: "public".into(),
            name: name.into(),
            comment: None,
            columns: vec![],
        };
        vec![Schema {
            name: "public".into(),
            entities: vec![entity("actor"), entity("film")],
            ..Default::default()
        }]
    }

    #[tokio::test]
    async fn test_generators_merge_in_order() {
        let pipeline = Pipeline::new(GenerationConfig::default())
            .generator(LineGenerator {
                name: "first",
                path: "shared",
            })
            .generator(LineGenerator {
                name: "second",
                path: "shared",
            });

        let rendered = pipeline.run(&schemas()).await.unwrap();
        assert_eq!(
            rendered.get("shared.ts").unwrap(),
            "// first actor\n\n// first film\n\n// second actor\n\n// second film\n"
        );
    }

    #[tokio::test]
    async fn test_hooks_run_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let pre_calls = calls.clone();
        let post_calls = calls.clone();

        let pipeline = Pipeline::new(GenerationConfig::default())
            .generator(LineGenerator {
                name: "lines",
                path: "public/lines",
            })
            .pre_render(PreRenderFn::new("pre", move |output: Output| {
                pre_calls.lock().unwrap().push(format!("pre:{}", output.len()));
                Ok(output)
            }))
            .post_render(PostRenderFn::new("post", move |mut rendered: RenderedOutput| {
                post_calls.lock().unwrap().push(format!("post:{}", rendered.len()));
                rendered.insert("extra.txt", "x");
                Ok(rendered)
            }));

        let rendered = pipeline.run(&schemas()).await.unwrap();
        assert_eq!(*calls.lock().unwrap(), vec!["pre:1", "post:1"]);
        assert!(rendered.get("extra.txt").is_some());
    }

    #[tokio::test]
    async fn test_pre_render_hooks_see_earlier_hooks() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let first_calls = calls.clone();
        let second_calls = calls.clone();
        let post_calls = calls.clone();

        let pipeline = Pipeline::new(GenerationConfig::default())
            .generator(LineGenerator {
                name: "lines",
                path: "public/lines",
            })
            .pre_render(PreRenderFn::new("first", move |mut output: Output| {
                first_calls.lock().unwrap().push(format!(
                    "first:{}:{}",
                    output.len(),
                    output.contains("marker")
                ));
                output.merge(
                    "marker",
                    FileKind::TypeScript,
                    vec![Declaration::Generic(GenericDeclaration {
                        comment: vec![],
                        lines: vec!["// marker".into()],
                        imports: vec![],
                    })],
                )?;
                Ok(output)
            }))
            .pre_render(PreRenderFn::new("second", move |output: Output| {
                second_calls.lock().unwrap().push(format!(
                    "second:{}:{}",
                    output.len(),
                    output.contains("marker")
                ));
                Ok(output)
            }))
            .post_render(PostRenderFn::new("post", move |rendered: RenderedOutput| {
                post_calls.lock().unwrap().push(format!(
                    "post:{}",
                    rendered.get("marker.ts").unwrap_or_default()
                ));
                Ok(rendered)
            }));

        pipeline.run(&schemas()).await.unwrap();
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["first:1:false", "second:2:true", "post:// marker\n"]
        );
    }

    #[tokio::test]
    async fn test_hook_failure_aborts() {
        let post_ran = Arc::new(Mutex::new(false));
        let flag = post_ran.clone();

        let pipeline = Pipeline::new(GenerationConfig::default())
            .generator(LineGenerator {
                name: "lines",
                path: "public/lines",
            })
            .pre_render(PreRenderFn::new("broken", |_output: Output| {
                Err(anyhow::anyhow!("database unavailable"))
            }))
            .post_render(PostRenderFn::new("never", move |rendered: RenderedOutput| {
                *flag.lock().unwrap() = true;
                Ok(rendered)
            }));

        let err = pipeline.run(&schemas()).await.unwrap_err();
        assert!(matches!(err, CodegenError::PreRenderHook { ref hook, .. } if hook == "broken"));
        assert!(!*post_ran.lock().unwrap());
    }

    #[tokio::test]
    async fn test_generator_error_names_subject() {
        let mut schemas = schemas();
        schemas[0].entities[0].columns.push(crate::schema::Column {
            name: "first".into(),
            type_name: "pg_catalog.text".into(),
            tags: [("type".to_string(), serde_json::json!(1))].into_iter().collect(),
            ..Default::default()
        });

        let pipeline = Pipeline::with_default_generators(GenerationConfig::default());
        let err = pipeline.run(&schemas).await.unwrap_err();
        match err {
            CodegenError::Generator {
                generator, subject, ..
            } => {
                assert_eq!(generator, "entities");
                assert_eq!(subject, "table public.actor");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_filter_skips_subjects() {
        let config = GenerationConfig {
            filter: Some(Arc::new(|s: &Subject<'_>| s.name() == "film")),
            ..Default::default()
        };
        let pipeline = Pipeline::with_default_generators(config);
        let output = pipeline.generate(&schemas()).unwrap();
        let paths: Vec<&str> = output.paths().collect();
        assert_eq!(paths, vec!["public/Film"]);
    }
}
