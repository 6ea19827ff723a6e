//! 场景字段绑定器的集中集成测试，测试代码位于 `tests/` 目录
