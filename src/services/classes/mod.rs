pub mod create;
pub mod get;
pub mod join;
pub mod list;
pub mod members;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::classes::requests::{
    ClassMemberParams, ClassQueryParams, CreateClassRequest, JoinClassRequest,
};
use crate::storage::Storage;

pub struct ClassService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 获取班级列表
    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        query: ClassQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_classes(self, request, query).await
    }

    pub async fn create_class(
        &self,
        request: &HttpRequest,
        class_data: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(self, request, class_data).await
    }

    // 根据班级 ID 获取班级详情
    pub async fn get_class(&self, request: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
        get::get_class(self, request, class_id).await
    }

    // 学生通过邀请码加入班级
    pub async fn join_class(
        &self,
        request: &HttpRequest,
        join_data: JoinClassRequest,
    ) -> ActixResult<HttpResponse> {
        join::join_class(self, request, join_data).await
    }

    pub async fn list_members(
        &self,
        request: &HttpRequest,
        class_id: i64,
        query: ClassMemberParams,
    ) -> ActixResult<HttpResponse> {
        members::list_members(self, request, class_id, query).await
    }

    // 从班级移除成员
    pub async fn remove_member(
        &self,
        request: &HttpRequest,
        class_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        members::remove_member(self, request, class_id, user_id).await
    }
}
