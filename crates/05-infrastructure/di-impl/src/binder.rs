//! 字段绑定器
//!
//! 绑定过程按以下顺序执行：
//!
//! 1. 从清单收集追加搜索根
//! 2. 按声明顺序逐个字段转换名称并查找目标
//! 3. 将节点或组件注入字段，失败时记录警告并保持字段原值

use crate::finder::NodeFinder;
use crate::scene_root_cache::SceneRootCache;
use crate::search_roots::SearchRootResolver;
use di_abstractions::{
    Bindable, BindingEntry, BindingKind, BindingReport, BindingResolver, FieldReport,
    Injection, ManifestRegistry, NodeRef, SceneHost,
};
use infrastructure_common::{
    BinderOptions, BindingError, BindingResult, ContainerKind, ElementType, FieldType,
    NameMangler, PrefixTable,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// 字段绑定器
pub struct FieldBinder {
    host: Arc<dyn SceneHost>,
    prefixes: Arc<PrefixTable>,
    cache: Arc<SceneRootCache>,
    options: BinderOptions,
    manifests: Arc<ManifestRegistry>,
}

impl FieldBinder {
    /// 创建绑定器，使用默认选项和全局清单注册表
    pub fn new(
        host: Arc<dyn SceneHost>,
        prefixes: Arc<PrefixTable>,
        cache: Arc<SceneRootCache>,
    ) -> Self {
        Self {
            host,
            prefixes,
            cache,
            options: BinderOptions::default(),
            manifests: ManifestRegistry::global(),
        }
    }

    /// 设置选项
    pub fn with_options(mut self, options: BinderOptions) -> Self {
        self.options = options;
        self
    }

    /// 使用独立的清单注册表
    pub fn with_manifest_registry(mut self, manifests: Arc<ManifestRegistry>) -> Self {
        self.manifests = manifests;
        self
    }

    /// 绑定选项
    pub fn options(&self) -> &BinderOptions {
        &self.options
    }

    /// 前缀表
    pub fn prefixes(&self) -> &PrefixTable {
        &self.prefixes
    }

    /// 场景根缓存
    pub fn cache(&self) -> &Arc<SceneRootCache> {
        &self.cache
    }

    fn bind_field<T: Bindable>(
        &self,
        owner: &mut T,
        entry: &BindingEntry<T>,
        roots: &[NodeRef],
        mangler: &NameMangler<'_>,
        buffer: &mut String,
    ) -> BindingResult<FieldReport> {
        match entry.declaration.kind {
            BindingKind::Single | BindingKind::SceneRoot => {
                self.bind_single(owner, entry, roots, mangler, buffer)
            }
            BindingKind::ListOfChildren => self.bind_list(owner, entry, roots, mangler, buffer),
            BindingKind::AuxiliaryRoot => Err(BindingError::UnsupportedFieldType {
                field: entry.declaration.field.name.clone(),
                declared: entry.declaration.field.field_type.to_string(),
            }),
        }
    }

    fn bind_single<T: Bindable>(
        &self,
        owner: &mut T,
        entry: &BindingEntry<T>,
        roots: &[NodeRef],
        mangler: &NameMangler<'_>,
        buffer: &mut String,
    ) -> BindingResult<FieldReport> {
        let declaration = &entry.declaration;
        let field = &declaration.field;
        let FieldType::Single(element) = &field.field_type else {
            return Err(BindingError::UnsupportedFieldType {
                field: field.name.clone(),
                declared: field.field_type.to_string(),
            });
        };

        mangler.mangle_into(declaration.target_input(), element.type_info(), buffer)?;
        let target = buffer.as_str();

        let node = match declaration.kind {
            BindingKind::SceneRoot => self
                .lookup_scene_root(target)
                .ok_or_else(|| BindingError::SceneRootNotFound {
                    field: field.name.clone(),
                    target: target.to_string(),
                })?,
            _ => NodeFinder::new(self.host.as_ref())
                .find(roots, target)
                .ok_or_else(|| BindingError::NodeNotFound {
                    field: field.name.clone(),
                    target: target.to_string(),
                })?,
        };

        let injection = match element {
            ElementType::Node => Injection::Node(node),
            ElementType::Component(info) => self
                .host
                .component(node, info.id)
                .map(Injection::Component)
                .ok_or_else(|| BindingError::ComponentMissing {
                    field: field.name.clone(),
                    target: target.to_string(),
                    component: info.name.clone(),
                })?,
        };

        Self::inject(owner, entry, injection)?;
        debug!(field = %field.name, object = target, node = %node, "字段绑定成功");
        Ok(FieldReport::bound(&field.name, declaration.kind, target, 1))
    }

    fn bind_list<T: Bindable>(
        &self,
        owner: &mut T,
        entry: &BindingEntry<T>,
        roots: &[NodeRef],
        mangler: &NameMangler<'_>,
        buffer: &mut String,
    ) -> BindingResult<FieldReport> {
        let declaration = &entry.declaration;
        let field = &declaration.field;
        let FieldType::Collection(container, element) = &field.field_type else {
            return Err(BindingError::InvalidContainer {
                field: field.name.clone(),
                declared: field.field_type.to_string(),
            });
        };

        mangler.mangle_into(declaration.target_input(), element.type_info(), buffer)?;
        let target = buffer.as_str();

        let parent = NodeFinder::new(self.host.as_ref())
            .find(roots, target)
            .ok_or_else(|| BindingError::ParentNotFound {
                field: field.name.clone(),
                target: target.to_string(),
            })?;

        let children = self.host.children(parent);
        let mut skipped = Vec::new();
        let injection = match element {
            ElementType::Node => Injection::nodes(*container, children),
            ElementType::Component(info) => {
                let mut components = Vec::with_capacity(children.len());
                for child in children {
                    match self.host.component(child, info.id) {
                        Some(component) => components.push(component),
                        None => {
                            let child_name = self
                                .host
                                .node_name(child)
                                .unwrap_or_else(|| child.to_string());
                            warn!(
                                field = %field.name,
                                parent = target,
                                child = %child_name,
                                component = %info.name,
                                "'{}' 上没有 '{}' 组件，未加入 '{}' 列表",
                                child_name,
                                info.name,
                                field.name
                            );
                            skipped.push(child_name);
                        }
                    }
                }
                Injection::components(*container, components)
            }
        };

        let elements = injection.len();
        Self::inject(owner, entry, injection)?;
        debug!(
            field = %field.name,
            parent = target,
            elements,
            container = container_name(*container),
            "列表字段绑定成功"
        );
        Ok(FieldReport::bound(&field.name, declaration.kind, target, elements)
            .with_skipped_children(skipped))
    }

    fn lookup_scene_root(&self, target: &str) -> Option<NodeRef> {
        if self.options.refresh_on_miss {
            self.cache.get_or_refresh(target)
        } else {
            self.cache.try_get(target)
        }
    }

    fn inject<T: Bindable>(
        owner: &mut T,
        entry: &BindingEntry<T>,
        injection: Injection,
    ) -> BindingResult<()> {
        if entry.slot.inject(owner, injection) {
            Ok(())
        } else {
            Err(BindingError::InjectionRejected {
                field: entry.declaration.field.name.clone(),
                expected: entry.declaration.field.field_type.to_string(),
            })
        }
    }
}

fn container_name(kind: ContainerKind) -> &'static str {
    match kind {
        ContainerKind::Array => "array",
        ContainerKind::List => "list",
    }
}

impl BindingResolver for FieldBinder {
    fn resolve<T: Bindable>(&self, owner: &mut T) -> Result<BindingReport, BindingError> {
        let manifest = self.manifests.manifest_for::<T>();
        let mut report = BindingReport::new(manifest.owner().clone());

        let roots =
            SearchRootResolver::new(self.host.as_ref()).resolve(&*owner, owner.node(), &manifest);
        report.search_roots = roots.roots;
        report.ignored_roots = roots.ignored;

        let mangler = NameMangler::new(&self.prefixes);
        let mut buffer = String::with_capacity(self.options.name_buffer_capacity);

        for entry in manifest.field_bindings() {
            let field = &entry.declaration.field;
            let kind = entry.declaration.kind;
            let field_report =
                match self.bind_field(owner, entry, &report.search_roots, &mangler, &mut buffer) {
                    Ok(field_report) => field_report,
                    Err(err) => {
                        if err.is_configuration_fault() {
                            error!(owner = %report.owner, field = %field.name, %kind, "{}", err);
                        } else {
                            warn!(owner = %report.owner, field = %field.name, %kind, "{}", err);
                        }
                        if !err.is_recoverable() && self.options.fail_on_invalid_name {
                            return Err(err);
                        }
                        FieldReport::unbound(&field.name, kind, err)
                    }
                };
            report.fields.push(field_report);
        }

        debug!(
            owner = %report.owner,
            fields = report.fields.len(),
            bound = report.bound_count(),
            warnings = report.warning_count(),
            "字段绑定完成"
        );
        Ok(report)
    }
}

impl std::fmt::Debug for FieldBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBinder")
            .field("prefixes", &self.prefixes.len())
            .field("cache", &self.cache)
            .field("options", &self.options)
            .finish()
    }
}
