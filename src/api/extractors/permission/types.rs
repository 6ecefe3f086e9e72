/**
 * Responsibility
 *
 * 主な責務
 *  - API が要求する権限 (identity provider の RBAC permission) を型として宣言する
 *
 * 置くもの
 *  - GetDrinksDetail, PostDrinks などのタグ型と権限文字列
 *
 * 変更理由
 *  - 保護されたエンドポイントが増えた
 */

/// A permission string granted by the identity provider.
pub trait Permission: Send + Sync + 'static {
    const NAME: &'static str;
}

pub enum GetDrinksDetail {}
impl Permission for GetDrinksDetail {
    const NAME: &'static str = "get:drinks-detail";
}

pub enum PostDrinks {}
impl Permission for PostDrinks {
    const NAME: &'static str = "post:drinks";
}

pub enum PatchDrinks {}
impl Permission for PatchDrinks {
    const NAME: &'static str = "patch:drinks";
}

pub enum DeleteDrinks {}
impl Permission for DeleteDrinks {
    const NAME: &'static str = "delete:drinks";
}
