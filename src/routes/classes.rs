use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::classes::requests::{
    ClassMemberParams, ClassQueryParams, CreateClassRequest, JoinClassRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::ClassService;
use crate::utils::{SafeIDI64, SafeUserIdI64};

// 懒加载的全局 CLASS_SERVICE 实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);

// HTTP处理程序
pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassQueryParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(&req, query.into_inner()).await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_class(&req, class_data.into_inner())
        .await
}

pub async fn join_class(
    req: HttpRequest,
    join_data: web::Json<JoinClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.join_class(&req, join_data.into_inner()).await
}

pub async fn get_class(req: HttpRequest, class_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(&req, class_id.0).await
}

pub async fn list_members(
    req: HttpRequest,
    class_id: SafeIDI64,
    query: web::Query<ClassMemberParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .list_members(&req, class_id.0, query.into_inner())
        .await
}

pub async fn remove_member(
    req: HttpRequest,
    class_id: SafeIDI64,
    user_id: SafeUserIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .remove_member(&req, class_id.0, user_id.0)
        .await
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                // 用户查询自己的班级列表，管理员可以查询所有班级
                web::resource("").route(web::get().to(list_classes)).route(
                    web::post()
                        .to(create_class)
                        // 教师创建自己的班级，管理员可以指定教师
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/join").route(
                    web::post()
                        .to(join_class)
                        // 学生通过邀请码加入
                        .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                ),
            )
            // 成员身份在业务层检查
            .service(web::resource("/{id}").route(web::get().to(get_class)))
            .service(web::resource("/{id}/members").route(web::get().to(list_members)))
            .service(
                web::resource("/{id}/members/{user_id}").route(web::delete().to(remove_member)),
            ),
    );
}
