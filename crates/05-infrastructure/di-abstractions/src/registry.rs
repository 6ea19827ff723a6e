//! 可绑定类型与绑定清单注册表

use crate::binding::BindingManifest;
use crate::scene::NodeRef;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tracing::debug;

/// 可绑定类型 trait
///
/// 实现者提供自身所在的节点以及字段绑定清单
pub trait Bindable: Send + Sync + 'static {
    /// 所在节点，作为首个搜索根
    fn node(&self) -> NodeRef;

    /// 构建绑定清单
    fn manifest() -> BindingManifest<Self>
    where
        Self: Sized;
}

/// 绑定清单注册表
///
/// 每个类型的清单只构建一次，之后的绑定调用共享同一份清单
#[derive(Default)]
pub struct ManifestRegistry {
    manifests: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

static GLOBAL_MANIFEST_REGISTRY: Lazy<Arc<ManifestRegistry>> =
    Lazy::new(|| Arc::new(ManifestRegistry::new()));

impl ManifestRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self {
            manifests: DashMap::new(),
        }
    }

    /// 进程级共享注册表
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_MANIFEST_REGISTRY)
    }

    /// 获取类型的清单，首次访问时构建
    pub fn manifest_for<T: Bindable>(&self) -> Arc<BindingManifest<T>> {
        let type_id = TypeId::of::<T>();
        if let Some(existing) = self.lookup::<T>(type_id) {
            return existing;
        }

        let entry = self
            .manifests
            .entry(type_id)
            .or_insert_with(|| {
                let manifest = T::manifest();
                debug!(
                    owner = %manifest.owner(),
                    entries = manifest.len(),
                    "构建绑定清单"
                );
                Arc::new(manifest) as Arc<dyn Any + Send + Sync>
            })
            .clone();

        match entry.downcast::<BindingManifest<T>>() {
            Ok(manifest) => manifest,
            // TypeId 键保证类型一致
            Err(_) => Arc::new(T::manifest()),
        }
    }

    /// 是否已缓存该类型的清单
    pub fn contains<T: 'static>(&self) -> bool {
        self.manifests.contains_key(&TypeId::of::<T>())
    }

    /// 已缓存的清单数量
    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }

    fn lookup<T: Bindable>(&self, type_id: TypeId) -> Option<Arc<BindingManifest<T>>> {
        let entry = self.manifests.get(&type_id)?.value().clone();
        entry.downcast::<BindingManifest<T>>().ok()
    }
}

impl std::fmt::Debug for ManifestRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestRegistry")
            .field("manifests", &self.manifests.len())
            .finish()
    }
}
