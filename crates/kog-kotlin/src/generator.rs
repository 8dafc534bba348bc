use std::collections::HashSet;
use std::path::MAIN_SEPARATOR_STR;

use kog_core::config::TargetConfig;
use kog_core::ir::ApiSpec;
use kog_core::{CodeGenerator, GenerateError, GeneratedFile};

use crate::ast::{Declaration, File};
use crate::emitter::emit;
use crate::lower::{ApiLowering, Lowering};
use crate::type_mapper::TypeMapper;

/// File holding every top-level primitive and collection alias.
const ALIASES_FILE: &str = "TypeAliases";

/// Kotlin client generator: kotlinx.serialization models plus Ktor API groups.
pub struct KotlinGenerator;

impl KotlinGenerator {
    /// Lower the whole API into files, models first, then groups, then the root.
    pub fn files(&self, api: &ApiSpec, config: &TargetConfig) -> Result<Vec<File>, GenerateError> {
        let model_package = format!("{}.model", config.package_name);
        let types = TypeMapper::new(&api.registry, &model_package);
        let lowering = Lowering::new(&types);

        let mut files = Vec::new();
        let mut declared = HashSet::new();
        let mut aliases = File::new(ALIASES_FILE, &model_package);
        for top in api.all_models() {
            let name = top.context.flatten();
            if !declared.insert(name.clone()) {
                continue;
            }
            if let Some(alias) = lowering.alias(&name, &top.model) {
                aliases.declarations.push(Declaration::TypeAlias(alias));
                continue;
            }
            let declarations = lowering.declarations(&top.model);
            if declarations.is_empty() {
                continue;
            }
            log::debug!("model {name}: {} declarations", declarations.len());
            let mut file = File::new(name, &model_package);
            file.declarations = declarations;
            files.push(file);
        }
        if !aliases.declarations.is_empty() {
            files.push(aliases);
        }

        let api_lowering = ApiLowering::new(&types, &config.package_name);
        for root in &api.groups {
            for group in root.flatten_groups() {
                files.push(api_lowering.group(group)?);
            }
        }
        files.push(api_lowering.root(&config.root_name, &api.groups));
        Ok(files)
    }
}

impl CodeGenerator for KotlinGenerator {
    type Config = TargetConfig;
    type Error = GenerateError;

    fn generate(
        &self,
        api: &ApiSpec,
        config: &TargetConfig,
    ) -> Result<Vec<GeneratedFile>, GenerateError> {
        let files = self.files(api, config)?;
        log::info!(
            "generated {} Kotlin files for {} {}",
            files.len(),
            api.info.title,
            api.info.version
        );
        Ok(files
            .iter()
            .map(|file| GeneratedFile {
                path: file_path(file),
                content: emit(file),
            })
            .collect())
    }
}

/// `com/example/model/Pet.kt`, joined with the platform separator.
fn file_path(file: &File) -> String {
    let mut segments: Vec<&str> = file.package.split('.').filter(|s| !s.is_empty()).collect();
    let name = format!("{}.kt", file.name);
    segments.push(&name);
    segments.join(MAIN_SEPARATOR_STR)
}
